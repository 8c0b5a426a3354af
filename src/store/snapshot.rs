use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    account::{Account, AccountError, AccountNumber},
    credential::Credential,
};

use super::PersistenceError;

/// On-disk shape of the whole store: `{"accounts": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_number: String,
    pub fullname: String,
    pub password: String,
    /// Written as a JSON number carrying the exact decimal digits.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
}

impl From<&Account> for AccountRecord {
    fn from(acc: &Account) -> Self {
        Self {
            account_number: acc.number().to_string(),
            fullname: acc.full_name().to_owned(),
            password: acc.credential().expose().to_owned(),
            balance: acc.balance(),
        }
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = AccountError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        Account::new(
            AccountNumber::parse(&record.account_number)?,
            record.fullname,
            Credential::new(record.password),
            record.balance,
        )
    }
}

impl Snapshot {
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        Self {
            accounts: accounts.into_iter().map(AccountRecord::from).collect(),
        }
    }

    /// Rebuilds accounts in snapshot order, rejecting any record that breaks
    /// an account invariant or repeats an account number.
    pub fn into_accounts(self) -> Result<Vec<Account>, PersistenceError> {
        let mut seen = HashSet::with_capacity(self.accounts.len());
        let mut accounts = Vec::with_capacity(self.accounts.len());
        for (index, record) in self.accounts.into_iter().enumerate() {
            if !seen.insert(record.account_number.clone()) {
                return Err(PersistenceError::DuplicateEntry {
                    number: record.account_number,
                });
            }
            let acc = Account::try_from(record)
                .map_err(|source| PersistenceError::InvalidEntry { index, source })?;
            accounts.push(acc);
        }
        Ok(accounts)
    }
}
