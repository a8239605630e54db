//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! The connection is constructed once at startup and injected into every
//! repository; there is no ambient global handle.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    LedgerError, LedgerRepository, PassbookError, PassbookRepository, SessionRepository,
    UserRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections);
    Database::connect(options).await
}
