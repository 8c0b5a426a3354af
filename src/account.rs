use std::fmt;

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::credential::Credential;

pub const ACCOUNT_NUMBER_LEN: usize = 12;

/// Account identifier, always exactly [`ACCOUNT_NUMBER_LEN`] ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn parse(raw: &str) -> Result<Self, AccountError> {
        if raw.len() == ACCOUNT_NUMBER_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(AccountError::InvalidAccountNumberFormat {
                number: raw.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads a user-typed amount: plain (`12.50`) or scientific (`1.25e1`)
/// notation, surrounding whitespace ignored. Sign is not checked here.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    input
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

/// Validated balance change. Produced by `handle_*`, consumed by [`Account::apply`].
#[derive(Debug, Clone)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> AccountEventKind {
        self.kind
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Account number must be exactly 12 digits, got `{number}`")]
    InvalidAccountNumberFormat { number: String },
    #[error("Full name must not be empty")]
    EmptyFullName,
    #[error("Opening balance must not be negative, got {balance}")]
    NegativeBalance { balance: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    number: AccountNumber,
    full_name: String,
    credential: Credential,
    balance: Decimal,
}

impl Account {
    pub fn new(
        number: AccountNumber,
        full_name: impl Into<String>,
        credential: Credential,
        balance: Decimal,
    ) -> Result<Self, AccountError> {
        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(AccountError::EmptyFullName);
        }
        if balance < Decimal::zero() {
            return Err(AccountError::NegativeBalance { balance });
        }
        Ok(Self {
            number,
            full_name,
            credential,
            balance,
        })
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Events are trusted here, all validation happens in `handle_*`.
    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => self.balance += event.amount,
            AccountEventKind::Withdrawn => self.balance -= event.amount,
        }
    }

    pub fn handle_deposit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        if amount <= Decimal::zero() || self.balance.checked_add(amount).is_none() {
            return Err(AccountError::InvalidAmount { amount });
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Deposited,
        })
    }

    pub fn handle_withdraw(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        if amount <= Decimal::zero() {
            return Err(AccountError::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Withdrawn,
        })
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let evt = self.handle_deposit(amount)?;
        self.apply(&evt);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let evt = self.handle_withdraw(amount)?;
        self.apply(&evt);
        Ok(())
    }
}
