//! Balance ledger store: the atomic transaction engine.
//!
//! Applying a transaction is a read-modify-write on the passbook's
//! `total_balance` that must be indivisible under concurrent requests. The
//! whole operation runs inside one storage transaction, and the balance is
//! re-read with `SELECT ... FOR UPDATE` so that concurrent applications
//! against the same passbook serialize on the row lock. That lock is the
//! only synchronization primitive in the system and it is correct across
//! multiple server processes sharing one database, which an in-process
//! mutex would not be.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use passbook_core::ledger::{self, BalanceError};
use passbook_core::sanitize::CleanTransaction;

use crate::entities::{passbooks, transactions};

/// Error types for ledger operations.
///
/// Deliberately small: not-found and not-owned are indistinguishable so the
/// existence of other users' passbooks is not leaked.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Passbook does not exist or is not owned by the caller.
    #[error("passbook not found or not owned by caller")]
    NotFoundOrUnauthorized,

    /// A debit would drive the balance below zero. Nothing was written.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Any lower-level read/write/commit fault.
    #[error("storage error: {0}")]
    Storage(#[from] DbErr),
}

/// Ledger repository: the only write path for balances and transactions.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Atomically applies a transaction to its passbook.
    ///
    /// Steps:
    /// 1. Verify the passbook exists and belongs to `user_id`.
    /// 2. Begin a storage transaction.
    /// 3. Re-read the balance with an exclusive row lock; a concurrent
    ///    application against the same passbook blocks here until this one
    ///    commits or rolls back.
    /// 4. Compute the new balance; abort with `InsufficientBalance` if it
    ///    would go negative.
    /// 5. Update the passbook row and insert the transaction row in the
    ///    same storage transaction, then commit.
    ///
    /// Every exit path that does not commit rolls back, including caller
    /// cancellation (dropping the `DatabaseTransaction` rolls it back), so
    /// no partial effect is ever visible. The operation is never retried
    /// here; retry policy belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundOrUnauthorized`, `InsufficientBalance`, or
    /// `Storage` for any database fault.
    #[instrument(skip(self, input), fields(passbook_id = %passbook_id, user_id = %user_id))]
    pub async fn apply_transaction(
        &self,
        passbook_id: Uuid,
        user_id: Uuid,
        input: CleanTransaction,
    ) -> Result<transactions::Model, LedgerError> {
        // Ownership gate before touching the ledger. Reported identically
        // for "missing" and "not yours".
        let owned = passbooks::Entity::find_by_id(passbook_id)
            .filter(passbooks::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        if owned.is_none() {
            return Err(LedgerError::NotFoundOrUnauthorized);
        }

        let txn = self.db.begin().await?;

        // The critical step: an authoritative re-read under an exclusive
        // row lock. No cached balance is ever trusted.
        let passbook = passbooks::Entity::find_by_id(passbook_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::NotFoundOrUnauthorized)?;

        let new_balance = match ledger::apply(passbook.total_balance, input.kind, input.amount) {
            Ok(balance) => balance,
            Err(BalanceError::Insufficient) => {
                txn.rollback().await?;
                return Err(LedgerError::InsufficientBalance);
            }
        };

        let now = Utc::now().into();

        let mut passbook_update: passbooks::ActiveModel = passbook.into();
        passbook_update.total_balance = Set(new_balance);
        passbook_update.updated_at = Set(now);
        passbook_update.update(&txn).await?;

        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            passbook_id: Set(passbook_id),
            user_id: Set(user_id),
            amount: Set(input.amount),
            transaction_type: Set(input.kind.into()),
            party_name: Set(input.party_name),
            description: Set(input.description),
            tags: Set(input.tags),
            transaction_date: Set(input.transaction_date.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = transaction.insert(&txn).await?;

        txn.commit().await?;

        Ok(inserted)
    }

    /// Lists all transactions for a passbook, newest first, scoped to the
    /// owning user.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn list_transactions(
        &self,
        passbook_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<transactions::Model>, LedgerError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::PassbookId.eq(passbook_id))
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Gets a single transaction scoped to its passbook and owning user.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn get_transaction(
        &self,
        passbook_id: Uuid,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Option<transactions::Model>, LedgerError> {
        let row = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::PassbookId.eq(passbook_id))
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(row)
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
