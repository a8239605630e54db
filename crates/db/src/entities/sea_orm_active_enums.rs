//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use passbook_core::TransactionKind;

/// Transaction type as stored in the `transaction_type` Postgres enum.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    /// Adds the amount to the passbook balance.
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    /// Subtracts the amount from the passbook balance.
    #[sea_orm(string_value = "DEBIT")]
    Debit,
}

impl From<TransactionKind> for TransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Credit => Self::Credit,
            TransactionKind::Debit => Self::Debit,
        }
    }
}

impl From<TransactionType> for TransactionKind {
    fn from(ty: TransactionType) -> Self {
        match ty {
            TransactionType::Credit => Self::Credit,
            TransactionType::Debit => Self::Debit,
        }
    }
}
