//! Dispatch pipeline tests for receipt-service.

mod common;

use common::{
    complete_config, sample_event, sample_payload, MemoryConfigStore, StubOrderSource, TestHarness,
};
use receipt_service::models::{OrderEvent, OrderRef};
use serde_json::json;

#[tokio::test]
async fn payment_event_delivers_receipt_email() {
    let harness = TestHarness::new(complete_config(), StubOrderSource::empty());

    harness.dispatcher.handle_payment_event(sample_event()).await;

    assert_eq!(harness.converter.conversions(), 1);
    let sent = harness.email.sent();
    assert_eq!(sent.len(), 1);

    let mail = &sent[0];
    assert_eq!(mail.to_address, "ada@example.com");
    assert_eq!(mail.to_name, "Ada");
    assert_eq!(mail.from_address, "billing@acme.test");
    assert_eq!(mail.from_name.as_deref(), Some("Acme Billing"));
    assert_eq!(mail.subject, "Your Acme receipt");
    assert_eq!(mail.body, "<p>Thanks for your purchase!</p>");
    assert!(mail.cc.is_empty());
    assert!(!mail.is_rebill);
    assert!(!mail.disable_logging);

    let attachment = mail.attachment.as_ref().expect("receipt should be attached");
    assert_eq!(attachment.filename, "billing_receipt_1001.pdf");
}

#[tokio::test]
async fn incomplete_config_skips_the_whole_pipeline() {
    let harness = TestHarness::new(MemoryConfigStore::empty(), StubOrderSource::empty());

    harness.dispatcher.handle_payment_event(sample_event()).await;

    assert_eq!(harness.converter.conversions(), 0);
    assert!(harness.email.sent().is_empty());
}

#[tokio::test]
async fn malformed_payload_never_reaches_the_caller() {
    let mut payload = sample_payload();
    payload.as_object_mut().unwrap().remove("order_products");
    let event = OrderEvent::from_value(payload).expect("payload should deserialize");

    let harness = TestHarness::new(complete_config(), StubOrderSource::empty());
    harness.dispatcher.handle_payment_event(event).await;

    assert!(harness.email.sent().is_empty());
}

#[tokio::test]
async fn delivery_failure_never_reaches_the_caller() {
    let harness = TestHarness::with_failing_email(complete_config(), StubOrderSource::empty());
    harness.dispatcher.handle_payment_event(sample_event()).await;
    assert_eq!(harness.converter.conversions(), 1);
}

#[tokio::test]
async fn temp_artifact_is_removed_after_delivery() {
    let harness = TestHarness::new(complete_config(), StubOrderSource::empty());
    harness.dispatcher.handle_payment_event(sample_event()).await;

    let sent = harness.email.sent();
    let path = &sent[0].attachment.as_ref().expect("attachment expected").path;
    assert!(!path.exists());
}

#[tokio::test]
async fn temp_artifact_is_removed_when_delivery_fails() {
    let harness = TestHarness::with_failing_email(complete_config(), StubOrderSource::empty());
    harness.dispatcher.handle_payment_event(sample_event()).await;

    let attempts = harness.email.sent();
    assert_eq!(attempts.len(), 1);
    let path = &attempts[0]
        .attachment
        .as_ref()
        .expect("attachment expected")
        .path;
    assert!(!path.exists());
}

#[tokio::test]
async fn rebill_events_set_the_rebill_context_flag() {
    let mut payload = sample_payload();
    payload["event_type"] = json!("payment_rebill");
    let event = OrderEvent::from_value(payload).expect("payload should deserialize");

    let harness = TestHarness::new(complete_config(), StubOrderSource::empty());
    harness.dispatcher.handle_payment_event(event).await;

    let sent = harness.email.sent();
    assert!(sent[0].is_rebill);
}

#[tokio::test]
async fn send_test_requires_an_existing_order() {
    let harness = TestHarness::new(complete_config(), StubOrderSource::empty());

    let response = harness.dispatcher.send_test("admin@acme.test").await;

    assert!(!response.success);
    assert_eq!(
        response.message.as_deref(),
        Some("at least one order is required")
    );
    assert_eq!(harness.converter.conversions(), 0);
    assert!(harness.email.sent().is_empty());
}

#[tokio::test]
async fn send_test_marks_and_redirects_the_email() {
    let order = OrderRef::new("C1", "O1");
    let harness = TestHarness::new(
        complete_config(),
        StubOrderSource::with_order(order, sample_payload()),
    );

    let response = harness.dispatcher.send_test("admin@acme.test").await;
    assert!(response.success);

    let sent = harness.email.sent();
    let mail = &sent[0];
    assert_eq!(mail.to_address, "admin@acme.test");
    assert_eq!(mail.subject, "[TEST] Your Acme receipt");
    assert!(mail.disable_logging);
    assert_eq!(
        mail.attachment.as_ref().expect("attachment expected").filename,
        "test_billing_receipt_1001.pdf"
    );
}

#[tokio::test]
async fn resend_rejects_an_invalid_order_reference() {
    let harness = TestHarness::new(complete_config(), StubOrderSource::empty());

    let response = harness
        .dispatcher
        .resend_receipt(&OrderRef::new("", ""), None)
        .await;

    assert!(!response.success);
    assert_eq!(
        response.message.as_deref(),
        Some("Unable to resend receipt. A valid order is required.")
    );
    assert!(harness.email.sent().is_empty());
}

#[tokio::test]
async fn resend_adds_the_additional_cc_address() {
    let order = OrderRef::new("C1", "O1");
    let harness = TestHarness::new(
        complete_config(),
        StubOrderSource::with_order(order.clone(), sample_payload()),
    );

    let response = harness
        .dispatcher
        .resend_receipt(&order, Some("records@acme.test"))
        .await;
    assert!(response.success);

    let sent = harness.email.sent();
    let mail = &sent[0];
    assert_eq!(mail.cc, vec!["records@acme.test".to_string()]);
    assert_eq!(mail.to_address, "ada@example.com");
    assert!(!mail.disable_logging);
    assert_eq!(
        mail.attachment.as_ref().expect("attachment expected").filename,
        "billing_receipt_1001.pdf"
    );
}

#[tokio::test]
async fn conversion_failure_surfaces_on_administrator_paths() {
    let order = OrderRef::new("C1", "O1");
    let harness = TestHarness::with_failing_converter(
        complete_config(),
        StubOrderSource::with_order(order.clone(), sample_payload()),
    );

    let response = harness.dispatcher.resend_receipt(&order, None).await;

    assert!(!response.success);
    let message = response.message.expect("failure message expected");
    assert!(message.contains("Conversion error"));
    assert!(harness.email.sent().is_empty());
}
