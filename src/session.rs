use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::{
    account::{Account, AccountNumber},
    auth::AuthGuard,
    store::{AccountStore, SnapshotStorage, StoreError},
    transfer::{TransferEngine, TransferReceipt},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please log in first")]
    NotAuthenticated,
    #[error("Already logged in as {number}")]
    AlreadyAuthenticated { number: AccountNumber },
    #[error("Session has ended")]
    Terminated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Teller session state.
///
/// ```text
/// Unauthenticated --login--> Authenticated --logout / close account--> Unauthenticated
///        \______________________________ terminate ___________________________/--> Terminated
/// ```
///
/// The session only remembers the account number; every operation borrows
/// the store for its own duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(AccountNumber),
    Terminated,
}

impl Session {
    pub fn current(&self) -> Option<&AccountNumber> {
        match self {
            Self::Authenticated(number) => Some(number),
            _ => None,
        }
    }

    /// A failed login leaves the session as it was.
    pub fn login<'s, S>(
        &mut self,
        store: &'s AccountStore<S>,
        number: &str,
        credential: &str,
    ) -> Result<&'s Account, SessionError>
    where
        S: SnapshotStorage,
    {
        match self {
            Self::Unauthenticated => {}
            Self::Authenticated(current) => {
                return Err(SessionError::AlreadyAuthenticated {
                    number: current.clone(),
                });
            }
            Self::Terminated => return Err(SessionError::Terminated),
        }
        let acc = AuthGuard.login(store, number, credential)?;
        *self = Self::Authenticated(acc.number().clone());
        Ok(acc)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        let number = self.require_account()?.clone();
        info!(account = %number, "logout");
        *self = Self::Unauthenticated;
        Ok(())
    }

    pub fn terminate(&mut self) {
        *self = Self::Terminated;
    }

    pub fn balance<S>(&self, store: &AccountStore<S>) -> Result<Decimal, SessionError>
    where
        S: SnapshotStorage,
    {
        let number = self.require_account()?;
        store
            .find_by_number(number.as_str())
            .map(Account::balance)
            .ok_or_else(|| {
                StoreError::AccountNotFound {
                    number: number.to_string(),
                }
                .into()
            })
    }

    /// Returns the new balance.
    pub fn deposit<S>(
        &self,
        store: &mut AccountStore<S>,
        amount: Decimal,
    ) -> Result<Decimal, SessionError>
    where
        S: SnapshotStorage,
    {
        let number = self.require_account()?;
        Ok(store.deposit(number.as_str(), amount)?)
    }

    /// Returns the new balance.
    pub fn withdraw<S>(
        &self,
        store: &mut AccountStore<S>,
        amount: Decimal,
    ) -> Result<Decimal, SessionError>
    where
        S: SnapshotStorage,
    {
        let number = self.require_account()?;
        Ok(store.withdraw(number.as_str(), amount)?)
    }

    pub fn transfer<S>(
        &self,
        store: &mut AccountStore<S>,
        engine: &TransferEngine,
        destination: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, SessionError>
    where
        S: SnapshotStorage,
    {
        let number = self.require_account()?;
        Ok(engine.transfer(store, number.as_str(), destination, amount)?)
    }

    /// Deletes the logged-in account with its own credential and logs out.
    ///
    /// The session also logs out when the account was removed but the
    /// following save failed; the error is still returned.
    pub fn close_account<S>(&mut self, store: &mut AccountStore<S>) -> Result<(), SessionError>
    where
        S: SnapshotStorage,
    {
        let number = self.require_account()?.clone();
        let credential = store
            .find_by_number(number.as_str())
            .map(|acc| acc.credential().clone())
            .ok_or_else(|| StoreError::AccountNotFound {
                number: number.to_string(),
            })?;
        let result = store.delete_account(number.as_str(), credential.expose());
        if store.find_by_number(number.as_str()).is_none() {
            *self = Self::Unauthenticated;
        }
        result?;
        Ok(())
    }

    fn require_account(&self) -> Result<&AccountNumber, SessionError> {
        match self {
            Self::Authenticated(number) => Ok(number),
            Self::Unauthenticated => Err(SessionError::NotAuthenticated),
            Self::Terminated => Err(SessionError::Terminated),
        }
    }
}
