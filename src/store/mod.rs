use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    account::{Account, AccountError, AccountNumber},
    credential::{Credential, CredentialVerifier, PlaintextVerifier},
};

use snapshot::Snapshot;

pub mod json_file;
pub mod memory;
pub mod snapshot;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to access snapshot `{}`", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Snapshot `{}` is malformed", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode snapshot")]
    Encode { source: serde_json::Error },
    #[error("Snapshot entry #{index} is invalid")]
    InvalidEntry { index: usize, source: AccountError },
    #[error("Snapshot contains account {number} more than once")]
    DuplicateEntry { number: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Account {number} not found")]
    AccountNotFound { number: String },
    #[error("Account {number} already exists")]
    DuplicateAccount { number: String },
    #[error("Wrong credential for account {number}")]
    AuthenticationFailure { number: String },
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Where the store snapshot lives.
///
/// [`json_file::JsonFileStorage`] is what the teller uses,
/// [`memory::MemoryStorage`] is handy when nothing should touch the disk.
pub trait SnapshotStorage {
    /// `Ok(None)` means no snapshot has been written yet.
    fn read(&self) -> Result<Option<Snapshot>, PersistenceError>;

    fn write(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// Owns every account. Each successful mutation rewrites the whole snapshot.
///
/// NOTE: a failed save is reported to the caller, but the in-memory change
/// that preceded it stays. Memory and disk are out of sync until the next
/// successful save.
pub struct AccountStore<S> {
    storage: S,
    verifier: Box<dyn CredentialVerifier>,
    accounts: Vec<Account>,
}

impl<S> AccountStore<S>
where
    S: SnapshotStorage,
{
    /// Empty store. Call [`AccountStore::load`] to pick up the snapshot.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            verifier: Box::new(PlaintextVerifier),
            accounts: Vec::new(),
        }
    }

    pub fn with_verifier(mut self, verifier: impl CredentialVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces in-memory accounts with the snapshot content.
    ///
    /// Never leaves the store unusable: a missing snapshot is created empty,
    /// an unreadable one leaves the store empty and the error is returned for
    /// the caller to report. Returns number of loaded accounts.
    pub fn load(&mut self) -> Result<usize, PersistenceError> {
        let loaded = match self.storage.read() {
            Ok(Some(snapshot)) => snapshot.into_accounts(),
            Ok(None) => {
                debug!("no snapshot yet, writing an empty one");
                self.accounts.clear();
                return self.save().map(|()| 0);
            }
            Err(err) => Err(err),
        };
        match loaded {
            Ok(accounts) => {
                debug!(accounts = accounts.len(), "loaded snapshot");
                self.accounts = accounts;
                Ok(self.accounts.len())
            }
            Err(err) => {
                warn!(error = %err, "snapshot unusable, continuing with no accounts");
                self.accounts.clear();
                Err(err)
            }
        }
    }

    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let snapshot = Snapshot::from_accounts(&self.accounts);
        self.storage.write(&snapshot).inspect_err(|err| {
            error!(error = %err, "failed to save snapshot, in-memory state is kept");
        })
    }

    pub fn find_by_number(&self, number: &str) -> Option<&Account> {
        self.accounts.iter().find(|acc| acc.number().as_str() == number)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn total_balance(&self) -> Decimal {
        self.accounts.iter().map(Account::balance).sum()
    }

    /// Checks `credential` against the stored one using the configured verifier.
    pub fn authenticate(&self, number: &str, credential: &str) -> Result<&Account, StoreError> {
        let acc = self
            .find_by_number(number)
            .ok_or_else(|| StoreError::AccountNotFound {
                number: number.to_owned(),
            })?;
        if self.verifier.verify(acc.credential(), credential) {
            Ok(acc)
        } else {
            Err(StoreError::AuthenticationFailure {
                number: number.to_owned(),
            })
        }
    }

    pub fn add_account(
        &mut self,
        number: &str,
        full_name: &str,
        credential: &str,
        initial_balance: Decimal,
    ) -> Result<(), StoreError> {
        if self.find_by_number(number).is_some() {
            return Err(StoreError::DuplicateAccount {
                number: number.to_owned(),
            });
        }
        let acc = Account::new(
            AccountNumber::parse(number)?,
            full_name,
            Credential::new(credential),
            initial_balance,
        )?;
        self.accounts.push(acc);
        info!(account = number, "account created");
        self.save()?;
        Ok(())
    }

    /// Removes the account and returns it.
    pub fn delete_account(&mut self, number: &str, credential: &str) -> Result<Account, StoreError> {
        self.authenticate(number, credential)?;
        let idx = self.require_position(number)?;
        let removed = self.accounts.remove(idx);
        info!(account = number, "account deleted");
        self.save()?;
        Ok(removed)
    }

    /// Returns the new balance.
    pub fn deposit(&mut self, number: &str, amount: Decimal) -> Result<Decimal, StoreError> {
        let idx = self.require_position(number)?;
        let acc = &mut self.accounts[idx];
        acc.deposit(amount)?;
        let balance = acc.balance();
        info!(account = number, %amount, "deposit");
        self.save()?;
        Ok(balance)
    }

    /// Returns the new balance.
    pub fn withdraw(&mut self, number: &str, amount: Decimal) -> Result<Decimal, StoreError> {
        let idx = self.require_position(number)?;
        let acc = &mut self.accounts[idx];
        acc.withdraw(amount)?;
        let balance = acc.balance();
        info!(account = number, %amount, "withdrawal");
        self.save()?;
        Ok(balance)
    }

    pub(crate) fn require_position(&self, number: &str) -> Result<usize, StoreError> {
        self.accounts
            .iter()
            .position(|acc| acc.number().as_str() == number)
            .ok_or_else(|| StoreError::AccountNotFound {
                number: number.to_owned(),
            })
    }

    pub(crate) fn account_at_mut(&mut self, idx: usize) -> &mut Account {
        &mut self.accounts[idx]
    }
}
