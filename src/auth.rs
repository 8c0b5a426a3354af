use rust_decimal::{Decimal, prelude::Zero};
use tracing::{info, warn};

use crate::{
    account::{Account, parse_amount},
    store::{AccountStore, SnapshotStorage, StoreError},
};

/// Entry point for login and registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthGuard;

impl AuthGuard {
    pub fn login<'s, S>(
        &self,
        store: &'s AccountStore<S>,
        number: &str,
        credential: &str,
    ) -> Result<&'s Account, StoreError>
    where
        S: SnapshotStorage,
    {
        store
            .authenticate(number, credential)
            .inspect(|acc| info!(account = %acc.number(), "login"))
            .inspect_err(|err| info!(account = number, error = %err, "login rejected"))
    }

    /// Opens a new account. An unparsable or negative opening balance is
    /// replaced with zero instead of failing the registration.
    ///
    /// Returns the opening balance that was actually used.
    pub fn register<S>(
        &self,
        store: &mut AccountStore<S>,
        number: &str,
        full_name: &str,
        credential: &str,
        initial_balance_input: &str,
    ) -> Result<Decimal, StoreError>
    where
        S: SnapshotStorage,
    {
        let balance = parse_opening_balance(initial_balance_input).unwrap_or_else(|| {
            warn!(input = initial_balance_input, "invalid opening balance, using 0");
            Decimal::zero()
        });
        store.add_account(number, full_name, credential, balance)?;
        Ok(balance)
    }
}

pub fn parse_opening_balance(input: &str) -> Option<Decimal> {
    parse_amount(input).filter(|balance| *balance >= Decimal::zero())
}
