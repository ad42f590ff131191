//! Fee template repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::fee_templates;

/// Input for creating a fee template.
#[derive(Debug, Clone)]
pub struct CreateFeeTemplateInput {
    /// The campus the template belongs to.
    pub campus_id: Uuid,
    /// Template name, e.g. `Tuition - Term 1`.
    pub name: String,
    /// Longer description, if any.
    pub description: Option<String>,
    /// The charge amount.
    pub amount: Decimal,
}

/// Fee template repository.
#[derive(Debug, Clone)]
pub struct FeeTemplateRepository {
    db: DatabaseConnection,
}

impl FeeTemplateRepository {
    /// Creates a new fee template repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee template.
    pub async fn create(
        &self,
        input: CreateFeeTemplateInput,
    ) -> Result<fee_templates::Model, DbErr> {
        let now = Utc::now().into();
        let template = fee_templates::ActiveModel {
            id: Set(Uuid::now_v7()),
            campus_id: Set(input.campus_id),
            name: Set(input.name),
            description: Set(input.description),
            amount: Set(input.amount),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        template.insert(&self.db).await
    }

    /// Finds a fee template by id. The caller checks campus ownership
    /// so a cross-campus probe answers Forbidden rather than NotFound.
    pub async fn find(&self, template_id: Uuid) -> Result<Option<fee_templates::Model>, DbErr> {
        fee_templates::Entity::find_by_id(template_id)
            .one(&self.db)
            .await
    }

    /// Lists active fee templates for a campus.
    pub async fn list(&self, campus_id: Uuid) -> Result<Vec<fee_templates::Model>, DbErr> {
        fee_templates::Entity::find()
            .filter(fee_templates::Column::CampusId.eq(campus_id))
            .filter(fee_templates::Column::IsActive.eq(true))
            .order_by_asc(fee_templates::Column::Name)
            .all(&self.db)
            .await
    }
}
