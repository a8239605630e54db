//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// Uniqueness of username and email is also enforced by database
    /// constraints; a race past [`Self::username_or_email_exists`] fails
    /// the insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Replaces a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or update fails. A missing
    /// user yields `Ok(None)`.
    pub async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = users::Entity::find_by_id(user_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now().into());

        Ok(Some(active.update(&self.db).await?))
    }

    /// Checks whether a username or email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_or_email_exists(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(
                users::Column::Username
                    .eq(username)
                    .or(users::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_row(id: Uuid, password_hash: &str) -> users::Model {
        let now = Utc::now().into();
        users::Model {
            id,
            username: "akash".to_string(),
            email: "akash@example.com".to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_update_password_missing_user_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let repo = UserRepository::new(db);
        let updated = repo
            .update_password(Uuid::new_v4(), "$argon2id$new")
            .await
            .unwrap();

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_password_writes_new_hash() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(user_id, "$argon2id$old")]])
            // UPDATE ... RETURNING the row with the replaced hash.
            .append_query_results([vec![user_row(user_id, "$argon2id$new")]])
            .into_connection();

        let log_handle = db.clone();
        let repo = UserRepository::new(db);
        let updated = repo
            .update_password(user_id, "$argon2id$new")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.password_hash, "$argon2id$new");

        let statements = format!("{:?}", log_handle.into_transaction_log());
        assert!(statements.contains("UPDATE \"users\""));
        assert!(statements.contains("password_hash"));
    }
}
