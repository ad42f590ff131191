//! Core business logic for Sala.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Invoice and payment balance logic
//! - `void` - Payment void request workflow
//! - `reports` - Financial report aggregation
//! - `numbering` - Document number generation
//! - `auth` - Password hashing

pub mod auth;
pub mod ledger;
pub mod numbering;
pub mod reports;
pub mod void;
