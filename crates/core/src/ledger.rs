//! Balance arithmetic and the non-negative balance rule.
//!
//! The decision of what a transaction does to a passbook balance lives here,
//! independent of storage. The database layer applies this exact function
//! inside its row-locked storage transaction, and tests can exercise the
//! rule without a database.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::TransactionKind;

/// Errors from applying a transaction to a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// A debit would drive the balance below zero.
    #[error("insufficient balance")]
    Insufficient,
}

/// Applies a transaction to a balance and returns the new balance.
///
/// CREDIT adds the amount, DEBIT subtracts it. The amount is expected to be
/// positive and truncated to cents already (see [`crate::sanitize`]).
///
/// # Errors
///
/// Returns [`BalanceError::Insufficient`] if the resulting balance would be
/// negative. The input balance is untouched in that case; the caller must
/// not record the transaction.
pub fn apply(
    balance: Decimal,
    kind: TransactionKind,
    amount: Decimal,
) -> Result<Decimal, BalanceError> {
    let new_balance = match kind {
        TransactionKind::Credit => balance + amount,
        TransactionKind::Debit => balance - amount,
    };

    if new_balance < Decimal::ZERO {
        return Err(BalanceError::Insufficient);
    }

    Ok(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_adds() {
        assert_eq!(
            apply(dec!(100.00), TransactionKind::Credit, dec!(50.00)),
            Ok(dec!(150.00))
        );
    }

    #[test]
    fn test_debit_subtracts() {
        assert_eq!(
            apply(dec!(100.00), TransactionKind::Debit, dec!(60.00)),
            Ok(dec!(40.00))
        );
    }

    #[test]
    fn test_debit_to_zero_allowed() {
        assert_eq!(
            apply(dec!(100.00), TransactionKind::Debit, dec!(100.00)),
            Ok(dec!(0.00))
        );
    }

    #[test]
    fn test_overdraft_rejected() {
        assert_eq!(
            apply(dec!(150.00), TransactionKind::Debit, dec!(200.00)),
            Err(BalanceError::Insufficient)
        );
    }

    #[test]
    fn test_concurrent_debits_scenario() {
        // Two DEBIT 60.00 against a balance of 100.00: whichever commits
        // first wins, the second sees the committed 40.00 and fails.
        let first = apply(dec!(100.00), TransactionKind::Debit, dec!(60.00)).unwrap();
        assert_eq!(first, dec!(40.00));
        assert_eq!(
            apply(first, TransactionKind::Debit, dec!(60.00)),
            Err(BalanceError::Insufficient)
        );
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
        prop_oneof![
            Just(TransactionKind::Credit),
            Just(TransactionKind::Debit),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// For any sequence of transactions, the final balance equals the
        /// initial balance plus the credits minus the debits of exactly
        /// those applications that succeeded, and no intermediate balance
        /// is ever negative.
        #[test]
        fn prop_no_lost_updates(
            initial in (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2)),
            txs in prop::collection::vec((kind_strategy(), amount_strategy()), 0..50),
        ) {
            let mut balance = initial;
            let mut credited = Decimal::ZERO;
            let mut debited = Decimal::ZERO;

            for (kind, amount) in txs {
                match apply(balance, kind, amount) {
                    Ok(next) => {
                        prop_assert!(next >= Decimal::ZERO);
                        match kind {
                            TransactionKind::Credit => credited += amount,
                            TransactionKind::Debit => debited += amount,
                        }
                        balance = next;
                    }
                    Err(BalanceError::Insufficient) => {
                        // Rejected: balance unchanged.
                        prop_assert_eq!(kind, TransactionKind::Debit);
                        prop_assert!(balance < amount);
                    }
                }
            }

            prop_assert_eq!(balance, initial + credited - debited);
        }

        /// A rejected debit leaves the balance observably unchanged.
        #[test]
        fn prop_rejection_has_no_effect(
            balance in (0i64..1_000i64).prop_map(|n| Decimal::new(n, 2)),
            amount in amount_strategy(),
        ) {
            let before = balance;
            let _ = apply(balance, TransactionKind::Debit, amount);
            prop_assert_eq!(balance, before);
        }
    }
}
