//! User repository for account and access grant operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use sala_shared::AccessLevel;

use crate::entities::{user_campus_access, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login name, unique across the system.
    pub username: String,
    /// Argon2id password hash (PHC string).
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
}

/// A user together with their campus access grants.
#[derive(Debug, Clone)]
pub struct UserWithGrants {
    /// The user row.
    pub user: users::Model,
    /// The user's campus grants.
    pub grants: Vec<user_campus_access::Model>,
}

/// User repository for account lookups and grant management.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an active user by username, with their campus grants.
    ///
    /// Used by login; returns `None` for unknown or deactivated users
    /// so the caller can answer with one generic credentials error.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserWithGrants>, DbErr> {
        let Some(user) = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let grants = user_campus_access::Entity::find()
            .filter(user_campus_access::Column::UserId.eq(user.id))
            .all(&self.db)
            .await?;

        Ok(Some(UserWithGrants { user, grants }))
    }

    /// Finds a user by id.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(user_id).one(&self.db).await
    }

    /// Creates a user.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(input.username),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        user.insert(&self.db).await
    }

    /// Grants a user access to a campus, replacing any existing grant.
    pub async fn grant_access(
        &self,
        user_id: Uuid,
        campus_id: Uuid,
        level: AccessLevel,
    ) -> Result<user_campus_access::Model, DbErr> {
        let existing = user_campus_access::Entity::find()
            .filter(user_campus_access::Column::UserId.eq(user_id))
            .filter(user_campus_access::Column::CampusId.eq(campus_id))
            .one(&self.db)
            .await?;

        if let Some(grant) = existing {
            let mut grant: user_campus_access::ActiveModel = grant.into();
            grant.access_level = Set(level.into());
            return grant.update(&self.db).await;
        }

        let grant = user_campus_access::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            campus_id: Set(campus_id),
            access_level: Set(level.into()),
            created_at: Set(Utc::now().into()),
        };
        grant.insert(&self.db).await
    }

    /// Removes a user's grant for a campus.
    pub async fn revoke_access(&self, user_id: Uuid, campus_id: Uuid) -> Result<(), DbErr> {
        user_campus_access::Entity::delete_many()
            .filter(user_campus_access::Column::UserId.eq(user_id))
            .filter(user_campus_access::Column::CampusId.eq(campus_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
