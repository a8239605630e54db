//! Session repository for refresh-token storage.
//!
//! Refresh tokens never hit the database in the clear: only the SHA-256
//! hash of the token is stored, so a leaked table cannot be replayed.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::sessions;

/// Hashes a refresh token for storage and lookup.
fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Session repository for refresh-token lifecycle.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a newly issued refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<sessions::Model, DbErr> {
        let now = Utc::now().into();
        let session = sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            refresh_token_hash: Set(hash_token(refresh_token)),
            expires_at: Set(expires_at.into()),
            revoked_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        session.insert(&self.db).await
    }

    /// Finds the live session for a presented refresh token, if any.
    ///
    /// A session is live when it has not been revoked and has not expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::RefreshTokenHash.eq(hash_token(refresh_token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Revokes a session so its refresh token can no longer be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn revoke(&self, session_id: Uuid) -> Result<(), DbErr> {
        let Some(session) = sessions::Entity::find_by_id(session_id).one(&self.db).await? else {
            return Ok(());
        };

        let now = Utc::now().into();
        let mut active: sessions::ActiveModel = session.into();
        active.revoked_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_and_hex() {
        let a = hash_token("some-refresh-token");
        let b = hash_token("some-refresh-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_differs_per_token() {
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }
}
