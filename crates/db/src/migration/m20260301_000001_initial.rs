//! Initial database migration.
//!
//! Creates the enum, core tables, constraints, and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(SESSIONS_SQL).await?;
        db.execute_unprepared(PASSBOOKS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE transaction_type AS ENUM (
    'CREDIT',
    'DEBIT'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(255) NOT NULL UNIQUE,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SESSIONS_SQL: &str = r"
CREATE TABLE sessions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    refresh_token_hash TEXT NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    revoked_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PASSBOOKS_SQL: &str = r"
CREATE TABLE passbooks (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    bank_name VARCHAR(255) NOT NULL,
    account_number VARCHAR(255) NOT NULL,
    nickname VARCHAR(255) NOT NULL,
    -- The balance invariant is enforced at both layers: the ledger
    -- repository rejects overdrafts before writing, and the CHECK is the
    -- final guard against any other write path.
    total_balance NUMERIC(11, 2) NOT NULL DEFAULT 0 CHECK (total_balance >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (user_id, bank_name, account_number)
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    passbook_id UUID NOT NULL REFERENCES passbooks(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(11, 2) NOT NULL CHECK (amount > 0),
    transaction_type transaction_type NOT NULL,
    party_name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    tags VARCHAR(512) NOT NULL DEFAULT '',
    transaction_date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_passbooks_user_id ON passbooks(user_id);
CREATE INDEX idx_transactions_passbook_id ON transactions(passbook_id);
CREATE INDEX idx_transactions_user_id ON transactions(user_id);
CREATE INDEX idx_transactions_transaction_date ON transactions(transaction_date);
CREATE INDEX idx_sessions_user_id ON sessions(user_id);
CREATE INDEX idx_sessions_refresh_token_hash ON sessions(refresh_token_hash);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS passbooks;
DROP TABLE IF EXISTS sessions;
DROP TABLE IF EXISTS users;
DROP TYPE IF EXISTS transaction_type;
";
