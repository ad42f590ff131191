//! Document number generation.
//!
//! Invoice and receipt numbers are a typed prefix plus a UUIDv7 in
//! simple (unhyphenated) form. The UUID keeps generation collision-free
//! across campuses without a shared counter, and its timestamp prefix
//! keeps numbers roughly sortable by creation time.

use uuid::Uuid;

/// Prefix for invoice numbers.
pub const INVOICE_PREFIX: &str = "INV";

/// Prefix for payment receipt numbers.
pub const RECEIPT_PREFIX: &str = "RCT";

/// Generates a new invoice number, e.g. `INV-0193e29ab1c1733e8a3f1b2c4d5e6f70`.
#[must_use]
pub fn invoice_number() -> String {
    document_number(INVOICE_PREFIX)
}

/// Generates a new receipt number, e.g. `RCT-0193e29ab1c1733e8a3f1b2c4d5e6f70`.
#[must_use]
pub fn receipt_number() -> String {
    document_number(RECEIPT_PREFIX)
}

fn document_number(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_invoice_number_format() {
        let number = invoice_number();
        assert!(number.starts_with("INV-"));
        // Prefix + dash + 32 hex chars
        assert_eq!(number.len(), 4 + 32);
        assert!(number[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_receipt_number_format() {
        let number = receipt_number();
        assert!(number.starts_with("RCT-"));
        assert_eq!(number.len(), 4 + 32);
    }

    #[test]
    fn test_numbers_are_unique() {
        let numbers: HashSet<String> = (0..1000).map(|_| invoice_number()).collect();
        assert_eq!(numbers.len(), 1000);
    }
}
