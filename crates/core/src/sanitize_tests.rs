//! Tests for input sanitization and validation.

use chrono::Utc;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn passbook_draft() -> PassbookDraft {
    PassbookDraft {
        bank_name: "Axis Bank".to_string(),
        account_number: "1234567890".to_string(),
        nickname: "salary".to_string(),
        total_balance: dec!(100.00),
    }
}

fn transaction_draft() -> TransactionDraft {
    TransactionDraft {
        transaction_type: "CREDIT".to_string(),
        amount: dec!(50.00),
        party_name: "ACME Corp".to_string(),
        description: "monthly invoice".to_string(),
        tags: "work,invoice".to_string(),
        transaction_date: Utc::now(),
    }
}

// ============================================================================
// Text cleaning
// ============================================================================

#[test]
fn test_clean_text_trims_whitespace() {
    assert_eq!(clean_text("  hello  "), "hello");
    assert_eq!(clean_text("\thello\n"), "hello");
}

#[test]
fn test_clean_text_strips_markup() {
    assert_eq!(clean_text("<script>alert(1)</script>hello"), "hello");
    assert_eq!(clean_text("<b>bold</b> name"), "bold name");
    assert_eq!(clean_text("<img src=x onerror=alert(1)>"), "");
}

#[test]
fn test_clean_text_plain_passthrough() {
    assert_eq!(clean_text("State Bank of India"), "State Bank of India");
}

// ============================================================================
// Monetary truncation
// ============================================================================

#[rstest]
#[case(dec!(10.999), dec!(10.99))]
#[case(dec!(10.991), dec!(10.99))]
#[case(dec!(10.99), dec!(10.99))]
#[case(dec!(10.9), dec!(10.9))]
#[case(dec!(10), dec!(10))]
#[case(dec!(0.009), dec!(0.00))]
fn test_truncate_cents(#[case] input: Decimal, #[case] expected: Decimal) {
    assert_eq!(truncate_cents(input), expected);
}

// ============================================================================
// Passbook sanitization
// ============================================================================

#[test]
fn test_passbook_happy_path() {
    let clean = sanitize_passbook(passbook_draft()).unwrap();
    assert_eq!(clean, passbook_draft());
}

#[test]
fn test_passbook_idempotent() {
    let once = sanitize_passbook(passbook_draft()).unwrap();
    let twice = sanitize_passbook(once.clone()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_passbook_balance_truncated() {
    let draft = PassbookDraft {
        total_balance: dec!(100.999),
        ..passbook_draft()
    };
    let clean = sanitize_passbook(draft).unwrap();
    assert_eq!(clean.total_balance, dec!(100.99));
}

#[test]
fn test_passbook_zero_balance_allowed() {
    let draft = PassbookDraft {
        total_balance: Decimal::ZERO,
        ..passbook_draft()
    };
    assert!(sanitize_passbook(draft).is_ok());
}

#[rstest]
#[case(dec!(-0.01))]
#[case(dec!(1000000000.00))]
fn test_passbook_balance_out_of_range(#[case] balance: Decimal) {
    let draft = PassbookDraft {
        total_balance: balance,
        ..passbook_draft()
    };
    assert_eq!(
        sanitize_passbook(draft),
        Err(SanitizeError::InvalidTotalBalance)
    );
}

#[test]
fn test_passbook_empty_bank_name() {
    let draft = PassbookDraft {
        bank_name: "   ".to_string(),
        ..passbook_draft()
    };
    assert_eq!(sanitize_passbook(draft), Err(SanitizeError::InvalidBankName));
}

#[test]
fn test_passbook_markup_only_bank_name_rejected() {
    // Stripping leaves nothing behind, so the field is effectively empty.
    let draft = PassbookDraft {
        bank_name: "<img src=x>".to_string(),
        ..passbook_draft()
    };
    assert_eq!(sanitize_passbook(draft), Err(SanitizeError::InvalidBankName));
}

#[test]
fn test_passbook_overlong_fields() {
    let long = "x".repeat(NAME_MAX_LEN + 1);

    let draft = PassbookDraft {
        account_number: long.clone(),
        ..passbook_draft()
    };
    assert_eq!(
        sanitize_passbook(draft),
        Err(SanitizeError::InvalidAccountNumber)
    );

    let draft = PassbookDraft {
        nickname: long,
        ..passbook_draft()
    };
    assert_eq!(sanitize_passbook(draft), Err(SanitizeError::InvalidNickname));
}

#[test]
fn test_passbook_first_invalid_field_wins() {
    let draft = PassbookDraft {
        bank_name: String::new(),
        nickname: String::new(),
        ..passbook_draft()
    };
    // Bank name is checked before nickname.
    assert_eq!(sanitize_passbook(draft), Err(SanitizeError::InvalidBankName));
}

// ============================================================================
// Transaction sanitization
// ============================================================================

#[test]
fn test_transaction_happy_path() {
    let clean = sanitize_transaction(transaction_draft()).unwrap();
    assert_eq!(clean.kind, TransactionKind::Credit);
    assert_eq!(clean.amount, dec!(50.00));
    assert_eq!(clean.party_name, "ACME Corp");
}

#[test]
fn test_transaction_amount_truncation_law() {
    let draft = TransactionDraft {
        amount: dec!(10.999),
        ..transaction_draft()
    };
    let clean = sanitize_transaction(draft).unwrap();
    assert_eq!(clean.amount, dec!(10.99));
}

#[rstest]
#[case(dec!(0))]
#[case(dec!(-10.00))]
#[case(dec!(0.001))] // truncates to zero
#[case(dec!(1000000000.00))]
fn test_transaction_amount_out_of_range(#[case] amount: Decimal) {
    let draft = TransactionDraft {
        amount,
        ..transaction_draft()
    };
    assert_eq!(
        sanitize_transaction(draft),
        Err(SanitizeError::InvalidAmount)
    );
}

#[test]
fn test_transaction_upper_bound_inclusive_after_truncation() {
    let draft = TransactionDraft {
        amount: dec!(999999999.999),
        ..transaction_draft()
    };
    let clean = sanitize_transaction(draft).unwrap();
    assert_eq!(clean.amount, dec!(999999999.99));
}

#[rstest]
#[case("")]
#[case("TRANSFER")]
#[case("credit")]
#[case("<b>CREDIT</b> ")] // stripping leaves "CREDIT" - tags must already be gone
fn test_transaction_type_must_be_member(#[case] kind: &str) {
    let draft = TransactionDraft {
        transaction_type: kind.to_string(),
        ..transaction_draft()
    };
    // The markup case normalizes to a valid member; everything else fails.
    let result = sanitize_transaction(draft);
    if kind.contains("CREDIT") {
        assert!(result.is_ok());
    } else {
        assert_eq!(result, Err(SanitizeError::InvalidTransactionType));
    }
}

#[test]
fn test_transaction_party_name_required() {
    let draft = TransactionDraft {
        party_name: "  ".to_string(),
        ..transaction_draft()
    };
    assert_eq!(
        sanitize_transaction(draft),
        Err(SanitizeError::InvalidPartyName)
    );
}

#[test]
fn test_transaction_description_may_be_empty() {
    let draft = TransactionDraft {
        description: String::new(),
        ..transaction_draft()
    };
    assert!(sanitize_transaction(draft).is_ok());
}

#[test]
fn test_transaction_tags_length_limit() {
    let draft = TransactionDraft {
        tags: "t".repeat(TAGS_MAX_LEN + 1),
        ..transaction_draft()
    };
    assert_eq!(
        sanitize_transaction(draft),
        Err(SanitizeError::InvalidTagLength)
    );

    let draft = TransactionDraft {
        tags: "t".repeat(TAGS_MAX_LEN),
        ..transaction_draft()
    };
    assert!(sanitize_transaction(draft).is_ok());
}

#[test]
fn test_transaction_idempotent() {
    let once = sanitize_transaction(transaction_draft()).unwrap();
    let again = sanitize_transaction(TransactionDraft {
        transaction_type: once.kind.to_string(),
        amount: once.amount,
        party_name: once.party_name.clone(),
        description: once.description.clone(),
        tags: once.tags.clone(),
        transaction_date: once.transaction_date,
    })
    .unwrap();
    assert_eq!(once, again);
}

#[test]
fn test_transaction_strips_markup_from_free_text() {
    let draft = TransactionDraft {
        party_name: "<script>x()</script>Acme".to_string(),
        description: "paid <i>online</i>".to_string(),
        tags: " <b>work</b> ".to_string(),
        ..transaction_draft()
    };
    let clean = sanitize_transaction(draft).unwrap();
    assert_eq!(clean.party_name, "Acme");
    assert_eq!(clean.description, "paid online");
    assert_eq!(clean.tags, "work");
}
