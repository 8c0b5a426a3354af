use rust_decimal::{Decimal, prelude::Zero};
use tracing::info;

use crate::{
    account::AccountError,
    store::{AccountStore, SnapshotStorage, StoreError},
};

/// Fee charged by the teller for every transfer.
pub const DEFAULT_TRANSFER_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub source: String,
    pub destination: String,
    pub amount: Decimal,
    pub fee: Decimal,
}

/// Moves money between two accounts of the same store.
///
/// The source pays `amount + fee`, the destination receives `amount`. The fee
/// is not credited anywhere, so every transfer lowers the store total by
/// exactly `fee`.
#[derive(Debug, Clone, Copy)]
pub struct TransferEngine {
    fee: Decimal,
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self {
            fee: DEFAULT_TRANSFER_FEE,
        }
    }
}

impl TransferEngine {
    pub fn new(fee: Decimal) -> Self {
        Self { fee }
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn transfer<S>(
        &self,
        store: &mut AccountStore<S>,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, StoreError>
    where
        S: SnapshotStorage,
    {
        transfer(store, source, destination, amount, self.fee)
    }
}

/// Both legs are validated before either is applied, so a failed transfer
/// leaves every balance untouched. The store is saved once, after both legs.
pub fn transfer<S>(
    store: &mut AccountStore<S>,
    source: &str,
    destination: &str,
    amount: Decimal,
    fee: Decimal,
) -> Result<TransferReceipt, StoreError>
where
    S: SnapshotStorage,
{
    let dst_idx = store.require_position(destination)?;
    let src_idx = store.require_position(source)?;
    if amount <= Decimal::zero() {
        return Err(AccountError::InvalidAmount { amount }.into());
    }
    if fee < Decimal::zero() {
        return Err(AccountError::InvalidAmount { amount: fee }.into());
    }
    let debit = amount
        .checked_add(fee)
        .ok_or(AccountError::InvalidAmount { amount })?;

    let withdrawn = store.account_at_mut(src_idx).handle_withdraw(debit)?;
    let deposited = store.account_at_mut(dst_idx).handle_deposit(amount)?;
    // source first: destination is only credited against a validated debit
    store.account_at_mut(src_idx).apply(&withdrawn);
    store.account_at_mut(dst_idx).apply(&deposited);

    info!(source, destination, %amount, %fee, "transfer");
    store.save()?;
    Ok(TransferReceipt {
        source: source.to_owned(),
        destination: destination.to_owned(),
        amount,
        fee,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use crate::store::memory::MemoryStorage;

    use super::*;

    const SRC: &str = "111111111111";
    const DST: &str = "222222222222";

    fn dec(value: u32) -> Decimal {
        Decimal::from_u32(value).unwrap()
    }

    fn store(src_balance: Decimal, dst_balance: Decimal) -> AccountStore<MemoryStorage> {
        let mut store = AccountStore::new(MemoryStorage::default());
        store.add_account(SRC, "Source", "pw1", src_balance).unwrap();
        store.add_account(DST, "Destination", "pw2", dst_balance).unwrap();
        store
    }

    fn balance(store: &AccountStore<MemoryStorage>, number: &str) -> Decimal {
        store.find_by_number(number).unwrap().balance()
    }

    #[test]
    fn transfer_charges_fee() {
        let mut store = store(dec(100), dec(10));
        let total_before = store.total_balance();
        let writes_before = store.storage().writes();

        let receipt = TransferEngine::default()
            .transfer(&mut store, SRC, DST, dec(20))
            .unwrap();

        assert_eq!(receipt.amount, dec(20));
        assert_eq!(receipt.fee, Decimal::new(5, 1));
        assert_eq!(balance(&store, SRC), Decimal::new(795, 1));
        assert_eq!(balance(&store, DST), dec(30));
        assert_eq!(total_before - store.total_balance(), Decimal::new(5, 1));
        // saved exactly once
        assert_eq!(store.storage().writes(), writes_before + 1);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut store = store(dec(10), dec(10));
        let writes_before = store.storage().writes();

        let err = transfer(&mut store, SRC, DST, dec(20), Decimal::new(5, 1)).unwrap_err();

        assert!(matches!(
            err,
            StoreError::Account(AccountError::InsufficientFunds { .. })
        ));
        assert_eq!(balance(&store, SRC), dec(10));
        assert_eq!(balance(&store, DST), dec(10));
        assert_eq!(store.storage().writes(), writes_before);
    }

    #[test]
    fn fee_counts_towards_funds() {
        // 20 is available, but 20 + 0.5 is not
        let mut store = store(dec(20), dec(0));
        let err = TransferEngine::default()
            .transfer(&mut store, SRC, DST, dec(20))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Account(AccountError::InsufficientFunds { .. })
        ));
        assert_eq!(balance(&store, DST), Decimal::ZERO);
    }

    #[test]
    fn unknown_destination() {
        let mut store = store(dec(100), dec(10));
        let err = TransferEngine::default()
            .transfer(&mut store, SRC, "999999999999", dec(20))
            .unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound { number } if number == "999999999999"));
        assert_eq!(balance(&store, SRC), dec(100));
    }

    #[test]
    fn non_positive_amount_and_negative_fee() {
        let mut store = store(dec(100), dec(10));
        for amount in [Decimal::ZERO, Decimal::NEGATIVE_ONE] {
            let err = TransferEngine::default()
                .transfer(&mut store, SRC, DST, amount)
                .unwrap_err();
            assert!(matches!(
                err,
                StoreError::Account(AccountError::InvalidAmount { .. })
            ));
        }
        let err = TransferEngine::new(Decimal::NEGATIVE_ONE)
            .transfer(&mut store, SRC, DST, dec(5))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Account(AccountError::InvalidAmount { .. })
        ));
        assert_eq!(balance(&store, SRC), dec(100));
        assert_eq!(balance(&store, DST), dec(10));
    }

    #[test]
    fn zero_fee() {
        let mut store = store(dec(100), dec(10));
        TransferEngine::new(Decimal::ZERO)
            .transfer(&mut store, SRC, DST, dec(100))
            .unwrap();
        assert_eq!(balance(&store, SRC), Decimal::ZERO);
        assert_eq!(balance(&store, DST), dec(110));
    }

    #[test]
    fn transfer_to_self_only_costs_fee() {
        let mut store = store(dec(100), dec(10));
        TransferEngine::default()
            .transfer(&mut store, SRC, SRC, dec(30))
            .unwrap();
        assert_eq!(balance(&store, SRC), Decimal::new(995, 1));
    }
}
