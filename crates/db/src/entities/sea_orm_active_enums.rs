//! Postgres enum mappings.
//!
//! These mirror the domain enums in `sala_core` and `sala_shared`;
//! `From` impls convert in both directions so repository code can hand
//! plain domain values to the core services.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice payment status (`invoice_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// No payment applied.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Partially paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully paid.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled, accepts no payments.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<sala_core::ledger::InvoiceStatus> for InvoiceStatus {
    fn from(status: sala_core::ledger::InvoiceStatus) -> Self {
        match status {
            sala_core::ledger::InvoiceStatus::Unpaid => Self::Unpaid,
            sala_core::ledger::InvoiceStatus::Partial => Self::Partial,
            sala_core::ledger::InvoiceStatus::Paid => Self::Paid,
            sala_core::ledger::InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for sala_core::ledger::InvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Unpaid => Self::Unpaid,
            InvoiceStatus::Partial => Self::Partial,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Void request status (`void_request_status` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "void_request_status")]
#[serde(rename_all = "lowercase")]
pub enum VoidRequestStatus {
    /// Awaiting resolution.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved, payment voided.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected, payment stands.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<sala_core::void::VoidRequestStatus> for VoidRequestStatus {
    fn from(status: sala_core::void::VoidRequestStatus) -> Self {
        match status {
            sala_core::void::VoidRequestStatus::Pending => Self::Pending,
            sala_core::void::VoidRequestStatus::Approved => Self::Approved,
            sala_core::void::VoidRequestStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<VoidRequestStatus> for sala_core::void::VoidRequestStatus {
    fn from(status: VoidRequestStatus) -> Self {
        match status {
            VoidRequestStatus::Pending => Self::Pending,
            VoidRequestStatus::Approved => Self::Approved,
            VoidRequestStatus::Rejected => Self::Rejected,
        }
    }
}

/// Campus access level (`access_level` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "access_level")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Read-only access.
    #[sea_orm(string_value = "read")]
    Read,
    /// Can record invoices and payments.
    #[sea_orm(string_value = "write")]
    Write,
    /// Can resolve void requests.
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl From<sala_shared::AccessLevel> for AccessLevel {
    fn from(level: sala_shared::AccessLevel) -> Self {
        match level {
            sala_shared::AccessLevel::Read => Self::Read,
            sala_shared::AccessLevel::Write => Self::Write,
            sala_shared::AccessLevel::Admin => Self::Admin,
        }
    }
}

impl From<AccessLevel> for sala_shared::AccessLevel {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Read => Self::Read,
            AccessLevel::Write => Self::Write,
            AccessLevel::Admin => Self::Admin,
        }
    }
}
