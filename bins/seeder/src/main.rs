//! Database seeder for Sala development and testing.
//!
//! Seeds two campuses, an admin user with access to both, a cashier
//! with write access to the first, plus a handful of students and fee
//! templates.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use sala_core::auth::hash_password;
use sala_db::entities::{
    campuses, fee_templates, sea_orm_active_enums::AccessLevel, students, user_campus_access, users,
};

/// Main campus ID (consistent for all seeds)
const MAIN_CAMPUS_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Branch campus ID (consistent for all seeds)
const BRANCH_CAMPUS_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Cashier user ID (consistent for all seeds)
const CASHIER_USER_ID: &str = "00000000-0000-0000-0000-000000000011";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("SALA__DATABASE__URL"))
        .expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = sala_db::connect(&database_url, 5)
        .await
        .expect("Failed to connect to database");

    println!("Seeding campuses...");
    seed_campus(&db, main_campus_id(), "Main Campus", "MAIN").await;
    seed_campus(&db, branch_campus_id(), "North Branch", "NORTH").await;

    println!("Seeding users...");
    seed_user(&db, admin_user_id(), "admin", "admin123", "Site Administrator").await;
    seed_user(&db, cashier_user_id(), "cashier", "cashier123", "Front Desk Cashier").await;

    println!("Seeding campus access...");
    seed_access(&db, admin_user_id(), main_campus_id(), AccessLevel::Admin).await;
    seed_access(&db, admin_user_id(), branch_campus_id(), AccessLevel::Admin).await;
    seed_access(&db, cashier_user_id(), main_campus_id(), AccessLevel::Write).await;

    println!("Seeding students...");
    seed_student(&db, main_campus_id(), "STU-0001", "Alya Rahman", "7A").await;
    seed_student(&db, main_campus_id(), "STU-0002", "Bimo Santoso", "7A").await;
    seed_student(&db, main_campus_id(), "STU-0003", "Citra Lestari", "8B").await;
    seed_student(&db, branch_campus_id(), "STU-0001", "Dewi Anggraini", "7C").await;

    println!("Seeding fee templates...");
    seed_fee_template(&db, main_campus_id(), "Tuition - Term 1", dec!(1500)).await;
    seed_fee_template(&db, main_campus_id(), "Activity Fee", dec!(250)).await;
    seed_fee_template(&db, branch_campus_id(), "Tuition - Term 1", dec!(1200)).await;

    println!("Seeding complete!");
}

fn main_campus_id() -> Uuid {
    Uuid::parse_str(MAIN_CAMPUS_ID).unwrap()
}

fn branch_campus_id() -> Uuid {
    Uuid::parse_str(BRANCH_CAMPUS_ID).unwrap()
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

fn cashier_user_id() -> Uuid {
    Uuid::parse_str(CASHIER_USER_ID).unwrap()
}

/// Seeds a campus if it does not exist yet.
async fn seed_campus(db: &DatabaseConnection, id: Uuid, name: &str, code: &str) {
    if campuses::Entity::find_by_id(id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Campus {code} already exists, skipping...");
        return;
    }

    let campus = campuses::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        code: Set(code.to_string()),
        address: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = campus.insert(db).await {
        eprintln!("Failed to insert campus {code}: {e}");
    } else {
        println!("  Created campus: {name} ({code})");
    }
}

/// Seeds a user with a freshly hashed password.
async fn seed_user(db: &DatabaseConnection, id: Uuid, username: &str, password: &str, full_name: &str) {
    if users::Entity::find_by_id(id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  User {username} already exists, skipping...");
        return;
    }

    let password_hash = hash_password(password).expect("Failed to hash password");

    let user = users::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        full_name: Set(full_name.to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert user {username}: {e}");
    } else {
        println!("  Created user: {username} (password: {password})");
    }
}

/// Seeds a campus grant for a user.
async fn seed_access(db: &DatabaseConnection, user_id: Uuid, campus_id: Uuid, level: AccessLevel) {
    let grant = user_campus_access::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(user_id),
        campus_id: Set(campus_id),
        access_level: Set(level),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = grant.insert(db).await {
        eprintln!("  Grant for {user_id} on {campus_id} skipped: {e}");
    }
}

/// Seeds a student if the code is not taken at the campus.
async fn seed_student(db: &DatabaseConnection, campus_id: Uuid, code: &str, name: &str, grade: &str) {
    let student = students::ActiveModel {
        id: Set(Uuid::now_v7()),
        campus_id: Set(campus_id),
        student_code: Set(code.to_string()),
        full_name: Set(name.to_string()),
        grade: Set(Some(grade.to_string())),
        guardian_name: Set(None),
        guardian_phone: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = student.insert(db).await {
        eprintln!("  Student {code} skipped: {e}");
    } else {
        println!("  Created student: {name} ({code})");
    }
}

/// Seeds a fee template.
async fn seed_fee_template(
    db: &DatabaseConnection,
    campus_id: Uuid,
    name: &str,
    amount: rust_decimal::Decimal,
) {
    let template = fee_templates::ActiveModel {
        id: Set(Uuid::now_v7()),
        campus_id: Set(campus_id),
        name: Set(name.to_string()),
        description: Set(None),
        amount: Set(amount),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = template.insert(db).await {
        eprintln!("  Fee template {name} skipped: {e}");
    } else {
        println!("  Created fee template: {name}");
    }
}
