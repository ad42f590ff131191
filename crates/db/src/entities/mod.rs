//! `SeaORM` entity definitions.

pub mod campuses;
pub mod fee_templates;
pub mod invoice_items;
pub mod invoices;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod students;
pub mod user_campus_access;
pub mod users;
pub mod void_requests;
