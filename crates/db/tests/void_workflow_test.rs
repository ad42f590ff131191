//! Integration tests for the void request workflow.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use sala_core::ledger::{InvoiceItemInput, InvoiceStatus};
use sala_core::void::{VoidError, VoidRequestStatus};
use sala_db::repositories::{
    CreateInvoiceInput, InvoiceRepository, PaymentRepository, RecordPaymentInput, VoidRepository,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

/// Seeds an invoice of 550 settled by one payment; returns the ids.
async fn settled_invoice(
    db: &sea_orm::DatabaseConnection,
    fixture: &common::Fixture,
) -> (Uuid, Uuid) {
    let detail = InvoiceRepository::new(db.clone())
        .create_invoice(CreateInvoiceInput {
            campus_id: fixture.campus_id,
            student_id: fixture.student_id,
            items: vec![InvoiceItemInput {
                description: "Tuition - Term 1".to_string(),
                amount: dec!(550.00),
            }],
            issue_date: date(1),
            due_date: date(31),
            created_by: fixture.user_id,
        })
        .await
        .expect("Failed to create invoice");

    let recorded = PaymentRepository::new(db.clone())
        .record_payment(RecordPaymentInput {
            campus_id: fixture.campus_id,
            invoice_id: detail.invoice.id,
            amount: dec!(550.00),
            payment_method: "cash".to_string(),
            reference_number: None,
            payment_date: date(2),
            received_by: fixture.user_id,
        })
        .await
        .expect("Failed to record payment");

    (detail.invoice.id, recorded.payment.id)
}

#[tokio::test]
async fn test_request_void_opens_pending() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (_, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db);

    let request = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "entered twice".to_string(),
        )
        .await
        .expect("Failed to open void request");

    let status: VoidRequestStatus = request.status.into();
    assert_eq!(status, VoidRequestStatus::Pending);
    assert_eq!(request.payment_id, payment_id);
}

#[tokio::test]
async fn test_second_request_while_pending_rejected() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (_, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db);

    voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "entered twice".to_string(),
        )
        .await
        .expect("Failed to open first request");

    let result = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "still wrong".to_string(),
        )
        .await;

    assert!(matches!(result, Err(VoidError::RequestAlreadyPending(id)) if id == payment_id));
}

#[tokio::test]
async fn test_approve_restores_invoice_balance() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (invoice_id, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db.clone());

    let request = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "entered twice".to_string(),
        )
        .await
        .expect("Failed to open request");

    let resolved = voids
        .approve_void(fixture.campus_id, request.id, fixture.user_id)
        .await
        .expect("Failed to approve request");

    let status: VoidRequestStatus = resolved.status.into();
    assert_eq!(status, VoidRequestStatus::Approved);
    assert!(resolved.resolved_by.is_some());

    let detail = InvoiceRepository::new(db.clone())
        .get_invoice(fixture.campus_id, invoice_id)
        .await
        .expect("Failed to reload invoice");
    assert_eq!(detail.invoice.paid_amount, dec!(0));
    let invoice_status: InvoiceStatus = detail.invoice.status.into();
    assert_eq!(invoice_status, InvoiceStatus::Unpaid);

    let payment = PaymentRepository::new(db)
        .find(fixture.campus_id, payment_id)
        .await
        .expect("Failed to reload payment");
    assert!(payment.is_voided);
    assert_eq!(payment.void_reason.as_deref(), Some("entered twice"));
    assert!(payment.voided_at.is_some());
    assert_eq!(payment.voided_by, Some(fixture.user_id));
}

#[tokio::test]
async fn test_double_approval_rejected() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (_, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db);

    let request = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "entered twice".to_string(),
        )
        .await
        .expect("Failed to open request");

    voids
        .approve_void(fixture.campus_id, request.id, fixture.user_id)
        .await
        .expect("Failed to approve request");

    let result = voids
        .approve_void(fixture.campus_id, request.id, fixture.user_id)
        .await;

    assert!(matches!(
        result,
        Err(VoidError::NotPending {
            current: VoidRequestStatus::Approved,
        })
    ));
}

#[tokio::test]
async fn test_reject_leaves_payment_standing() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (invoice_id, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db.clone());

    let request = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "looks wrong".to_string(),
        )
        .await
        .expect("Failed to open request");

    let resolved = voids
        .reject_void(
            fixture.campus_id,
            request.id,
            fixture.user_id,
            "payment was legitimate".to_string(),
        )
        .await
        .expect("Failed to reject request");

    let status: VoidRequestStatus = resolved.status.into();
    assert_eq!(status, VoidRequestStatus::Rejected);
    assert_eq!(
        resolved.rejection_reason.as_deref(),
        Some("payment was legitimate")
    );

    let detail = InvoiceRepository::new(db)
        .get_invoice(fixture.campus_id, invoice_id)
        .await
        .expect("Failed to reload invoice");
    assert_eq!(detail.invoice.paid_amount, dec!(550.00));
}

#[tokio::test]
async fn test_new_request_allowed_after_rejection() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (_, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db);

    let request = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "looks wrong".to_string(),
        )
        .await
        .expect("Failed to open request");

    voids
        .reject_void(
            fixture.campus_id,
            request.id,
            fixture.user_id,
            "checked, it is fine".to_string(),
        )
        .await
        .expect("Failed to reject request");

    // The rejection resolved the first request, so a new one may open.
    voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "no, really, it is wrong".to_string(),
        )
        .await
        .expect("Second request should open after rejection");
}

#[tokio::test]
async fn test_concurrent_requests_open_exactly_one() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let (_, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db);

    let open = |reason: &str| {
        voids.request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            reason.to_string(),
        )
    };

    let (first, second) = tokio::join!(open("entered twice"), open("also saw it"));

    // The partial unique index lets exactly one request through.
    let succeeded = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);

    let loser = if first.is_ok() { second } else { first };
    assert!(matches!(loser, Err(VoidError::RequestAlreadyPending(id)) if id == payment_id));
}

#[tokio::test]
async fn test_cross_campus_void_access_is_forbidden() {
    let Some(db) = common::connect().await else {
        return;
    };
    let fixture = common::seed_fixture(&db).await;
    let other = common::seed_fixture(&db).await;
    let (_, payment_id) = settled_invoice(&db, &fixture).await;
    let voids = VoidRepository::new(db);

    // A correctly guessed payment id from another campus is denied.
    let result = voids
        .request_void(
            other.campus_id,
            payment_id,
            other.user_id,
            "cross-campus".to_string(),
        )
        .await;
    assert!(matches!(result, Err(VoidError::CampusForbidden)));

    let request = voids
        .request_void(
            fixture.campus_id,
            payment_id,
            fixture.user_id,
            "entered twice".to_string(),
        )
        .await
        .expect("Failed to open request");

    let result = voids
        .approve_void(other.campus_id, request.id, other.user_id)
        .await;
    assert!(matches!(result, Err(VoidError::CampusForbidden)));

    let result = voids
        .reject_void(
            other.campus_id,
            request.id,
            other.user_id,
            "not ours".to_string(),
        )
        .await;
    assert!(matches!(result, Err(VoidError::CampusForbidden)));
}
