//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Each repository holds an injected connection; nothing
//! here reaches for global state.

pub mod ledger;
pub mod passbook;
pub mod session;
pub mod user;

pub use ledger::{LedgerError, LedgerRepository};
pub use passbook::{PassbookError, PassbookRepository};
pub use session::SessionRepository;
pub use user::UserRepository;
