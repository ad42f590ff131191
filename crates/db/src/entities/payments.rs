//! `SeaORM` Entity for payments table.
//!
//! Payments are append-only. A voided payment keeps its row; only the
//! `is_voided`/`void_reason`/`voided_at`/`voided_by` fields change, and
//! only through an approved void request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campus_id: Uuid,
    pub invoice_id: Uuid,
    pub receipt_number: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub payment_date: Date,
    pub is_voided: bool,
    pub void_reason: Option<String>,
    pub voided_at: Option<DateTimeWithTimeZone>,
    pub voided_by: Option<Uuid>,
    pub received_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id"
    )]
    Invoices,
    #[sea_orm(has_many = "super::void_requests::Entity")]
    VoidRequests,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::void_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoidRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
