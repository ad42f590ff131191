//! Campus repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::campuses;

/// Input for creating a campus.
#[derive(Debug, Clone)]
pub struct CreateCampusInput {
    /// Display name.
    pub name: String,
    /// Short unique code, e.g. `NORTH`.
    pub code: String,
    /// Street address, if known.
    pub address: Option<String>,
}

/// Campus repository.
#[derive(Debug, Clone)]
pub struct CampusRepository {
    db: DatabaseConnection,
}

impl CampusRepository {
    /// Creates a new campus repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active campuses ordered by code.
    pub async fn list_active(&self) -> Result<Vec<campuses::Model>, DbErr> {
        campuses::Entity::find()
            .filter(campuses::Column::IsActive.eq(true))
            .order_by_asc(campuses::Column::Code)
            .all(&self.db)
            .await
    }

    /// Finds a campus by id.
    pub async fn find_by_id(&self, campus_id: Uuid) -> Result<Option<campuses::Model>, DbErr> {
        campuses::Entity::find_by_id(campus_id).one(&self.db).await
    }

    /// Creates a campus.
    pub async fn create(&self, input: CreateCampusInput) -> Result<campuses::Model, DbErr> {
        let now = Utc::now().into();
        let campus = campuses::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            code: Set(input.code),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        campus.insert(&self.db).await
    }
}
