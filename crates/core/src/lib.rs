//! Core business logic for Passbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Balance arithmetic and the non-negative balance rule
//! - `sanitize` - Input sanitization and validation for submissions
//! - `types` - Transaction kind and related domain types
//! - `auth` - Password hashing

pub mod auth;
pub mod ledger;
pub mod sanitize;
pub mod types;

pub use types::TransactionKind;
