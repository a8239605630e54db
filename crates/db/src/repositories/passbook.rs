//! Passbook repository for passbook metadata CRUD.
//!
//! All reads and writes here are scoped to the owning user. The running
//! balance is intentionally out of reach: metadata updates never touch
//! `total_balance`, which is mutated only by the ledger repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use passbook_core::sanitize::PassbookDraft;

use crate::entities::passbooks;

/// Error types for passbook operations.
#[derive(Debug, thiserror::Error)]
pub enum PassbookError {
    /// Passbook not found for this user.
    #[error("passbook not found")]
    NotFound,

    /// A passbook for the same (user, bank, account number) already exists.
    #[error("account already exists")]
    Duplicate,

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Passbook repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct PassbookRepository {
    db: DatabaseConnection,
}

impl PassbookRepository {
    /// Creates a new passbook repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a passbook for a user from a sanitized draft.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the user already has a passbook for the same
    /// bank and account number, or `Database` on other failures. The
    /// (user, bank, account) uniqueness is also enforced by a database
    /// constraint, so a race between the check and the insert still cannot
    /// produce two rows.
    pub async fn create(
        &self,
        user_id: Uuid,
        draft: PassbookDraft,
    ) -> Result<passbooks::Model, PassbookError> {
        let existing = passbooks::Entity::find()
            .filter(passbooks::Column::UserId.eq(user_id))
            .filter(passbooks::Column::BankName.eq(draft.bank_name.clone()))
            .filter(passbooks::Column::AccountNumber.eq(draft.account_number.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(PassbookError::Duplicate);
        }

        let now = Utc::now().into();
        let passbook = passbooks::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            bank_name: Set(draft.bank_name),
            account_number: Set(draft.account_number),
            nickname: Set(draft.nickname),
            total_balance: Set(draft.total_balance),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(passbook.insert(&self.db).await?)
    }

    /// Lists all passbooks owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<passbooks::Model>, DbErr> {
        passbooks::Entity::find()
            .filter(passbooks::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
    }

    /// Finds a passbook by id, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        passbook_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<passbooks::Model>, DbErr> {
        passbooks::Entity::find_by_id(passbook_id)
            .filter(passbooks::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Updates a passbook's metadata from a sanitized draft.
    ///
    /// The draft's `total_balance` is ignored: balance changes go through
    /// the ledger repository exclusively.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the passbook does not exist for this user.
    pub async fn update(
        &self,
        passbook_id: Uuid,
        user_id: Uuid,
        draft: PassbookDraft,
    ) -> Result<passbooks::Model, PassbookError> {
        let passbook = self
            .find_owned(passbook_id, user_id)
            .await?
            .ok_or(PassbookError::NotFound)?;

        let mut active: passbooks::ActiveModel = passbook.into();
        active.bank_name = Set(draft.bank_name);
        active.account_number = Set(draft.account_number);
        active.nickname = Set(draft.nickname);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a passbook, scoped to the owning user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the passbook does not exist for this user.
    pub async fn delete(&self, passbook_id: Uuid, user_id: Uuid) -> Result<(), PassbookError> {
        let passbook = self
            .find_owned(passbook_id, user_id)
            .await?
            .ok_or(PassbookError::NotFound)?;

        passbook.delete(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn draft() -> PassbookDraft {
        PassbookDraft {
            bank_name: "Axis Bank".to_string(),
            account_number: "1234567890".to_string(),
            nickname: "salary".to_string(),
            total_balance: dec!(100.00),
        }
    }

    fn row(user_id: Uuid) -> passbooks::Model {
        let now = Utc::now().into();
        passbooks::Model {
            id: Uuid::new_v4(),
            user_id,
            bank_name: "Axis Bank".to_string(),
            account_number: "1234567890".to_string(),
            nickname: "salary".to_string(),
            total_balance: dec!(100.00),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_account() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(user_id)]])
            .into_connection();

        let repo = PassbookRepository::new(db);
        let result = repo.create(user_id, draft()).await;

        assert!(matches!(result, Err(PassbookError::Duplicate)));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<passbooks::Model>::new()])
            .into_connection();

        let repo = PassbookRepository::new(db);
        let result = repo.update(Uuid::new_v4(), Uuid::new_v4(), draft()).await;

        assert!(matches!(result, Err(PassbookError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_owned_filters_by_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<passbooks::Model>::new()])
            .into_connection();

        let log_handle = db.clone();
        let repo = PassbookRepository::new(db);
        let found = repo
            .find_owned(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert!(found.is_none());
        let statements = format!("{:?}", log_handle.into_transaction_log());
        assert!(statements.contains("user_id"));
    }
}
