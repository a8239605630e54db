//! Domain types for passbook transactions.

use serde::{Deserialize, Serialize};

/// Transaction kind: either a credit to or a debit from a passbook.
///
/// A CREDIT adds its amount to the passbook's total balance, a DEBIT
/// subtracts it. The wire representation is the uppercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Adds the amount to the balance.
    Credit,
    /// Subtracts the amount from the balance.
    Debit,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credit => write!(f, "CREDIT"),
            Self::Debit => write!(f, "DEBIT"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}
