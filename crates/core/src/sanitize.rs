//! Input sanitization and validation for passbook and transaction submissions.
//!
//! Every free-text field coming over the wire is trimmed and stripped of all
//! markup before it is length-checked or stored, so stored-injection through
//! party names, nicknames or tags is not possible. Monetary values are
//! truncated toward zero to 2 decimal places *before* range checks.
//!
//! All functions here are pure: they either return the normalized record or
//! the first violated constraint. Storage is never touched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::TransactionKind;

/// Maximum length for bank name, account number, nickname and party name.
pub const NAME_MAX_LEN: usize = 255;

/// Maximum length for the tags field.
pub const TAGS_MAX_LEN: usize = 512;

/// Upper bound for amounts and balances, matching `NUMERIC(11,2)`.
#[must_use]
pub fn money_max() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}

/// Validation errors, naming the first invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// Bank name empty or too long after normalization.
    #[error("invalid bank name")]
    InvalidBankName,

    /// Account number empty or too long after normalization.
    #[error("invalid account number")]
    InvalidAccountNumber,

    /// Balance outside [0, 999999999.99].
    #[error("invalid total balance")]
    InvalidTotalBalance,

    /// Nickname empty or too long after normalization.
    #[error("invalid nickname")]
    InvalidNickname,

    /// Transaction type empty or not CREDIT/DEBIT.
    #[error("invalid transaction type")]
    InvalidTransactionType,

    /// Amount outside (0, 999999999.99].
    #[error("invalid amount")]
    InvalidAmount,

    /// Party name empty or too long after normalization.
    #[error("invalid party name")]
    InvalidPartyName,

    /// Tags longer than 512 characters.
    #[error("invalid tag length")]
    InvalidTagLength,
}

/// Raw passbook submission before sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassbookDraft {
    /// Bank name.
    pub bank_name: String,
    /// Account number at the bank.
    pub account_number: String,
    /// User-facing nickname.
    pub nickname: String,
    /// Opening balance.
    pub total_balance: Decimal,
}

/// Raw transaction submission before sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Transaction type string as submitted.
    pub transaction_type: String,
    /// Monetary amount.
    pub amount: Decimal,
    /// Counterparty name.
    pub party_name: String,
    /// Free-text description.
    pub description: String,
    /// Comma-separated tags.
    pub tags: String,
    /// When the transaction took place.
    pub transaction_date: DateTime<Utc>,
}

/// A transaction submission that passed sanitization.
///
/// The only way to obtain one is [`sanitize_transaction`], so holding this
/// type implies the amount is positive, in range and truncated to cents, and
/// every string field is clean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTransaction {
    /// Parsed transaction kind.
    pub kind: TransactionKind,
    /// Positive amount, truncated to 2 decimal places.
    pub amount: Decimal,
    /// Counterparty name.
    pub party_name: String,
    /// Free-text description (may be empty).
    pub description: String,
    /// Tags (may be empty).
    pub tags: String,
    /// When the transaction took place.
    pub transaction_date: DateTime<Utc>,
}

/// Trims whitespace and strips all markup from a string.
///
/// Equivalent of a strict no-tags-allowed HTML sanitizer policy: tags are
/// removed, text content survives.
#[must_use]
pub fn clean_text(s: &str) -> String {
    let trimmed = s.trim();
    ammonia::Builder::empty()
        .clean(trimmed)
        .to_string()
        .trim()
        .to_string()
}

/// Truncates a decimal toward zero to 2 decimal places.
///
/// This is truncation, not rounding: `10.999` becomes `10.99`. For the
/// positive values used here this is a floor.
#[must_use]
pub fn truncate_cents(value: Decimal) -> Decimal {
    value.trunc_with_scale(2)
}

/// Sanitizes and validates a passbook submission.
///
/// # Errors
///
/// Returns the first violated constraint; field order matches the original
/// submission shape (bank name, account number, balance, nickname).
pub fn sanitize_passbook(draft: PassbookDraft) -> Result<PassbookDraft, SanitizeError> {
    let bank_name = clean_text(&draft.bank_name);
    if bank_name.is_empty() || bank_name.len() > NAME_MAX_LEN {
        return Err(SanitizeError::InvalidBankName);
    }

    let account_number = clean_text(&draft.account_number);
    if account_number.is_empty() || account_number.len() > NAME_MAX_LEN {
        return Err(SanitizeError::InvalidAccountNumber);
    }

    let total_balance = truncate_cents(draft.total_balance);
    if total_balance < Decimal::ZERO || total_balance > money_max() {
        return Err(SanitizeError::InvalidTotalBalance);
    }

    let nickname = clean_text(&draft.nickname);
    if nickname.is_empty() || nickname.len() > NAME_MAX_LEN {
        return Err(SanitizeError::InvalidNickname);
    }

    Ok(PassbookDraft {
        bank_name,
        account_number,
        nickname,
        total_balance,
    })
}

/// Sanitizes and validates a transaction submission.
///
/// # Errors
///
/// Returns the first violated constraint. Rejection happens before any
/// storage access; an amount of zero or less never reaches the ledger.
pub fn sanitize_transaction(draft: TransactionDraft) -> Result<CleanTransaction, SanitizeError> {
    let type_str = clean_text(&draft.transaction_type);
    let kind: TransactionKind = type_str
        .parse()
        .map_err(|_| SanitizeError::InvalidTransactionType)?;

    // Truncation happens before range checks: 0.001 truncates to zero and is
    // rejected, never reaching the ledger.
    let amount = truncate_cents(draft.amount);
    if amount <= Decimal::ZERO || amount > money_max() {
        return Err(SanitizeError::InvalidAmount);
    }

    let party_name = clean_text(&draft.party_name);
    if party_name.is_empty() || party_name.len() > NAME_MAX_LEN {
        return Err(SanitizeError::InvalidPartyName);
    }

    let description = clean_text(&draft.description);

    let tags = clean_text(&draft.tags);
    if tags.len() > TAGS_MAX_LEN {
        return Err(SanitizeError::InvalidTagLength);
    }

    Ok(CleanTransaction {
        kind,
        amount,
        party_name,
        description,
        tags,
        transaction_date: draft.transaction_date,
    })
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
