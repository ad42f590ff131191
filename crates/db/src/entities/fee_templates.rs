//! `SeaORM` Entity for fee_templates table.
//!
//! Reusable charge definitions (tuition, lab fee, ...) that seed
//! invoice line items.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campus_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campuses::Entity",
        from = "Column::CampusId",
        to = "super::campuses::Column::Id"
    )]
    Campuses,
}

impl Related<super::campuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campuses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
