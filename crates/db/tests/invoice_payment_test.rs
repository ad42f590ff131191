//! Integration tests for invoice creation and payment recording.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use sala_core::ledger::{InvoiceItemInput, InvoiceStatus, LedgerError};
use sala_db::repositories::{CreateInvoiceInput, InvoiceRepository, PaymentRepository, RecordPaymentInput};

fn items(amounts: &[rust_decimal::Decimal]) -> Vec<InvoiceItemInput> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| InvoiceItemInput {
            description: format!("Fee line {i}"),
            amount: *amount,
        })
        .collect()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

#[tokio::test]
async fn test_create_invoice_totals_items() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let repo = InvoiceRepository::new(db);

    let detail = repo
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(500.00), dec!(50.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    assert_eq!(detail.invoice.total_amount, dec!(550.00));
    assert_eq!(detail.invoice.paid_amount, dec!(0));
    assert!(detail.invoice.invoice_number.starts_with("INV-"));
    assert_eq!(detail.items.len(), 2);
}

#[tokio::test]
async fn test_create_invoice_rejects_empty_items() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let repo = InvoiceRepository::new(db);

    let result = repo
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: vec![],
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await;

    assert!(matches!(result, Err(LedgerError::EmptyInvoice)));
}

#[tokio::test]
async fn test_create_invoice_unknown_student() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let repo = InvoiceRepository::new(db);

    let ghost = Uuid::now_v7();
    let result = repo
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: ghost,
            items: items(&[dec!(100)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await;

    assert!(matches!(result, Err(LedgerError::StudentNotFound(id)) if id == ghost));
}

#[tokio::test]
async fn test_record_payment_updates_invoice() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let invoices = InvoiceRepository::new(db.clone());
    let payments = PaymentRepository::new(db);

    let detail = invoices
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(550.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    let recorded = payments
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(200.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(2),
            received_by: fixture.user_id,
        })
        .await
        .expect("Failed to record payment");

    assert!(recorded.payment.receipt_number.starts_with("RCT-"));
    assert_eq!(recorded.invoice.paid_amount, dec!(200.00));
    let status: InvoiceStatus = recorded.invoice.status.into();
    assert_eq!(status, InvoiceStatus::Partial);
}

#[tokio::test]
async fn test_record_payment_rejects_overpayment_on_fresh_read() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let invoices = InvoiceRepository::new(db.clone());
    let payments = PaymentRepository::new(db);

    let detail = invoices
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(550.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    // First payment takes most of the balance.
    payments
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(500.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(2),
            received_by: fixture.user_id,
        })
        .await
        .expect("Failed to record first payment");

    // A second payment over the remaining 50 must fail against the
    // re-read balance, whatever the caller thought the balance was.
    let result = payments
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(100.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(2),
            received_by: fixture.user_id,
        })
        .await;

    match result {
        Err(LedgerError::PaymentExceedsBalance { amount, balance }) => {
            assert_eq!(amount, dec!(100.00));
            assert_eq!(balance, dec!(50.00));
        }
        other => panic!("Expected PaymentExceedsBalance, got {other:?}"),
    }
}

#[tokio::test]
async fn test_settled_invoice_rejects_further_payments() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let invoices = InvoiceRepository::new(db.clone());
    let payments = PaymentRepository::new(db);

    let detail = invoices
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(100.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    let recorded = payments
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(100.00),
            payment_method: "transfer".to_string(),
            reference_number: Some("TRX-1".to_string()),
            payment_date: date(2),
            received_by: fixture.user_id,
        })
        .await
        .expect("Failed to settle invoice");

    let status: InvoiceStatus = recorded.invoice.status.into();
    assert_eq!(status, InvoiceStatus::Paid);

    let result = payments
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(1.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(3),
            received_by: fixture.user_id,
        })
        .await;

    assert!(matches!(result, Err(LedgerError::InvoiceNotOpen(_))));
}

#[tokio::test]
async fn test_concurrent_payments_serialize_on_invoice_row() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let invoices = InvoiceRepository::new(db.clone());
    let payments = PaymentRepository::new(db.clone());

    let detail = invoices
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(500.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    let input = |amount| RecordPaymentInput {
        campus_id: fixture.campus_id,
        invoice_id: detail.invoice.id,
        amount,
        payment_method: "cash".to_string(),
        reference_number: None,
        payment_date: date(2),
        received_by: fixture.user_id,
    };

    // Two 300s against a 500 balance. The row lock serializes them:
    // exactly one commits, the other sees balance 200 and is rejected.
    let (a, b) = tokio::join!(
        payments.record_payment(input(dec!(300.00))),
        payments.record_payment(input(dec!(300.00))),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent payment must win");

    let loser = if a.is_ok() { b } else { a };
    match loser {
        Err(LedgerError::PaymentExceedsBalance { amount, balance }) => {
            assert_eq!(amount, dec!(300.00));
            assert_eq!(balance, dec!(200.00));
        }
        other => panic!("Expected PaymentExceedsBalance, got {other:?}"),
    }

    let settled = invoices
        .get_invoice(fixture.campus_id, detail.invoice.id)
        .await
        .expect("Failed to re-read invoice");
    assert_eq!(settled.invoice.paid_amount, dec!(300.00));
    assert_eq!(settled.invoice.balance(), dec!(200.00));
}

#[tokio::test]
async fn test_cross_campus_invoice_access_is_forbidden() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let other = common::seed_fixture(&db).await;
    let invoices = InvoiceRepository::new(db.clone());

    let detail = invoices
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(100.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    // A correctly guessed id from another campus is denied, never
    // reported as missing.
    let result = invoices.get_invoice(other.campus_id, detail.invoice.id).await;
    assert!(matches!(result, Err(LedgerError::CampusForbidden)));

    let result = invoices
        .list_student_invoices(other.campus_id, fixture.student_id, None)
        .await;
    assert!(matches!(result, Err(LedgerError::CampusForbidden)));

    let result = invoices
        .create_invoice(CreateInvoiceInput {
            campus_id: other.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(100.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: other.user_id,
        })
        .await;
    assert!(matches!(result, Err(LedgerError::CampusForbidden)));

    // A genuinely unknown id still answers NotFound.
    let result = invoices.get_invoice(other.campus_id, Uuid::now_v7()).await;
    assert!(matches!(result, Err(LedgerError::InvoiceNotFound(_))));
}

#[tokio::test]
async fn test_cross_campus_payment_access_is_forbidden() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let other = common::seed_fixture(&db).await;

    let detail = InvoiceRepository::new(db.clone())
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: items(&[dec!(500.00)]),
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    let payments = PaymentRepository::new(db);
    let result = payments
        .record_payment(RecordPaymentInput {
            campus_id: other.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(100.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(2),
            received_by: other.user_id,
        })
        .await;
    assert!(matches!(result, Err(LedgerError::CampusForbidden)));

    let recorded = payments
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(100.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(2),
            received_by: fixture.user_id,
        })
        .await
        .expect("Failed to record payment");

    let result = payments.find(other.campus_id, recorded.payment.id).await;
    assert!(matches!(result, Err(LedgerError::CampusForbidden)));

    let result = payments
        .list_by_invoice(other.campus_id, detail.invoice.id)
        .await;
    assert!(matches!(result, Err(LedgerError::CampusForbidden)));
}
