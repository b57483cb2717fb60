// Integration tests for POST /callback
// Covers the completed and failed branches, unmatched ids and malformed envelopes.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use helpers::*;
use mpesa_pay::payments::{Payment, PaymentStatus};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

fn seeded_repository() -> Arc<InMemoryPaymentRepository> {
    let repository = Arc::new(InMemoryPaymentRepository::new());
    repository.insert(Payment::pending(
        "payment-1".to_string(),
        "254700000000".to_string(),
        dec!(50),
        "XYZ".to_string(),
    ));
    repository
}

#[actix_web::test]
async fn test_success_callback_completes_payment() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(success_callback("XYZ", "ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Callback processed" }));

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("ABC123"));
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[actix_web::test]
async fn test_result_code_zero_completes_payment() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let mut payload = success_callback("XYZ", "QKJ4ABC9XY");
    payload["Body"]["stkCallback"]["ResultCode"] = json!(0);

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("QKJ4ABC9XY"));
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[actix_web::test]
async fn test_failure_callback_keeps_transaction_id() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    // No CallbackMetadata on the failure branch
    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(cancelled_callback("XYZ"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("XYZ"));
    assert_eq!(payment.status, PaymentStatus::Failed);
}

#[actix_web::test]
async fn test_failure_callback_ignores_misshapen_metadata() {
    let junk_metadata = [
        json!({ "Item": { "Name": "x" } }),
        json!({ "Item": [{ "Value": 1 }] }),
        json!("n/a"),
    ];

    for metadata in junk_metadata {
        let repository = seeded_repository();
        let controller =
            payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
        let app = test::init_service(
            App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
        )
        .await;

        let mut payload = cancelled_callback("XYZ");
        payload["Body"]["stkCallback"]["CallbackMetadata"] = metadata.clone();

        let req = test::TestRequest::post()
            .uri("/callback")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200, "metadata {} should not block", metadata);

        let payment = repository.get("payment-1").unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert_eq!(payment.transaction_id.as_deref(), Some("XYZ"));
    }
}

#[actix_web::test]
async fn test_other_result_desc_without_code_fails_payment() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let payload = json!({
        "Body": {
            "stkCallback": {
                "CheckoutRequestID": "XYZ",
                "ResultDesc": "DS timeout user cannot be reached"
            }
        }
    });
    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(payment.transaction_id.as_deref(), Some("XYZ"));
}

#[actix_web::test]
async fn test_unmatched_checkout_id_still_acknowledged() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(success_callback("UNKNOWN", "ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.transaction_id.as_deref(), Some("XYZ"));
}

#[actix_web::test]
async fn test_malformed_envelope_is_500() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let payloads = [
        json!({ "stkCallback": { "CheckoutRequestID": "XYZ" } }),
        json!({ "Body": {} }),
        json!({ "Body": { "stkCallback": { "ResultDesc": "Request cancelled by user" } } }),
    ];

    for payload in payloads {
        let req = test::TestRequest::post()
            .uri("/callback")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500, "payload {} should be rejected", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Failed to process callback" }));
    }

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_payload("not json at all")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    assert_eq!(
        repository.get("payment-1").unwrap().status,
        PaymentStatus::Pending
    );
}

#[actix_web::test]
async fn test_success_without_receipt_is_rejected() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let mut payload = success_callback("XYZ", "ABC123");
    payload["Body"]["stkCallback"]["CallbackMetadata"]["Item"] = json!([
        { "Name": "Amount", "Value": 50 },
        { "Name": "PhoneNumber", "Value": 254700000000u64 }
    ]);

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.transaction_id.as_deref(), Some("XYZ"));
}

#[actix_web::test]
async fn test_database_failure_still_acknowledged() {
    let repository = seeded_repository();
    repository.fail_writes();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(success_callback("XYZ", "ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Callback processed");
}

#[actix_web::test]
async fn test_repeated_success_callback_is_noop() {
    let repository = seeded_repository();
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/callback")
            .set_json(success_callback("XYZ", "ABC123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    let payment = repository.get("payment-1").unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("ABC123"));
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[actix_web::test]
async fn test_pay_then_callback_end_to_end() {
    let repository = Arc::new(InMemoryPaymentRepository::new());
    let controller = payment_controller(Arc::new(FakeGateway::new()), repository.clone(), None);
    let app = test::init_service(
        App::new().configure(|cfg| mpesa_pay::configure_routes(cfg, controller.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/pay")
        .set_json(pay_request("254700000000", 50))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let payment_id = created["payment_id"].as_str().unwrap().to_string();
    let checkout_id = created["checkout_request_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/callback")
        .set_json(success_callback(&checkout_id, "ABC123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/payments/{}", payment_id))
        .to_request();
    let payment: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(payment["status"], "completed");
    assert_eq!(payment["transaction_id"], "ABC123");
}
