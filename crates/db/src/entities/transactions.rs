//! `SeaORM` Entity for the transactions table.
//!
//! Rows are immutable once inserted: the only write path is the ledger
//! repository's atomic balance-update-and-insert.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub passbook_id: Uuid,
    /// Denormalized owner id for access-check convenience.
    pub user_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((11, 2)))")]
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub party_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub tags: String,
    pub transaction_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::passbooks::Entity",
        from = "Column::PassbookId",
        to = "super::passbooks::Column::Id"
    )]
    Passbooks,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::passbooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passbooks.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
