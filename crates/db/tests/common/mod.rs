//! Shared setup for database integration tests.
//!
//! Tests run against the database named by `DATABASE_URL` (or
//! `SALA__DATABASE__URL`) and skip silently when neither is set, so
//! the suite stays green on machines without Postgres.

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::env;
use uuid::Uuid;

use sala_db::migration::Migrator;
use sala_db::repositories::{
    CampusRepository, CreateCampusInput, CreateStudentInput, CreateUserInput, StudentRepository,
    UserRepository,
};

pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .ok()
        .or_else(|| env::var("SALA__DATABASE__URL").ok())
}

/// Connects and migrates, or returns `None` when no database is configured.
pub async fn connect() -> Option<DatabaseConnection> {
    let url = database_url()?;
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    Some(db)
}

/// A seeded campus, user, and student to hang ledger rows off.
pub struct Fixture {
    pub campus_id: Uuid,
    pub user_id: Uuid,
    pub student_id: Uuid,
}

pub async fn seed_fixture(db: &DatabaseConnection) -> Fixture {
    let tag = Uuid::now_v7().simple().to_string();
    // campuses.code is VARCHAR(20)
    let short_tag = &tag[tag.len() - 12..];

    let campus = CampusRepository::new(db.clone())
        .create(CreateCampusInput {
            name: format!("Test Campus {tag}"),
            code: format!("T-{short_tag}"),
            address: None,
        })
        .await
        .expect("Failed to create campus");

    let user = UserRepository::new(db.clone())
        .create_user(CreateUserInput {
            username: format!("teller-{tag}"),
            password_hash: "$argon2id$test".to_string(),
            full_name: "Test Teller".to_string(),
        })
        .await
        .expect("Failed to create user");

    let student = StudentRepository::new(db.clone())
        .create(CreateStudentInput {
            campus_id: campus.id,
            student_code: format!("S-{tag}"),
            full_name: "Test Student".to_string(),
            grade: Some("7".to_string()),
            guardian_name: None,
            guardian_phone: None,
        })
        .await
        .expect("Failed to create student");

    Fixture {
        campus_id: campus.id,
        user_id: user.id,
        student_id: student.id,
    }
}
