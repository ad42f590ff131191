//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every repository method that reads or writes ledger data takes the
//! campus id it operates in. Lists stay inside that campus; by-id
//! lookups verify ownership and deny an entity from another campus
//! rather than report it missing. The API layer resolves which
//! campuses a caller may use.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CampusRepository, FeeTemplateRepository, InvoiceRepository, PaymentRepository,
    ReportRepository, StudentRepository, UserRepository, VoidRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(max_connections);
    Database::connect(options).await
}
