//! Test helper module for receipt-service integration tests.
//!
//! Provides in-memory collaborator implementations and payload builders.

#![allow(dead_code)]

use async_trait::async_trait;
use receipt_service::config::{keys, ConfigStore};
use receipt_service::error::ReceiptError;
use receipt_service::models::{OrderEvent, OrderRef};
use receipt_service::services::providers::{MockDocumentConverter, MockEmailSender, OrderSource};
use receipt_service::ReceiptDispatcher;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory configuration store seeded from key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    values: HashMap<String, String>,
}

impl MemoryConfigStore {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Complete configuration enabling receipt generation.
pub fn complete_config() -> MemoryConfigStore {
    MemoryConfigStore::new(&[
        (keys::BUSINESS_NAME, "Acme Memberships"),
        (keys::BUSINESS_ADDRESS, "1 Main St, Springfield"),
        (keys::EMAIL_FROM, "billing@acme.test"),
        (keys::EMAIL_FROM_NAME, "Acme Billing"),
        (keys::EMAIL_SUBJECT, "Your Acme receipt"),
        (keys::EMAIL_BODY, "<p>Thanks for your purchase!</p>"),
    ])
}

/// Payload shaped like a typical successful payment event.
pub fn sample_payload() -> Value {
    json!({
        "event_type": "payment_received",
        "member_id": "M1",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "billing_address": "12 Analytical Way",
        "billing_address2": "",
        "billing_city": "London",
        "billing_state": "",
        "billing_zip_code": "N1 7AA",
        "billing_country": "UK",
        "order_products": "[{\"name\":\"Plan A\"}]",
        "order_subtotal": 100,
        "order_discount": 0,
        "order_shipping": 0,
        "order_total": 100,
        "order_number": "1001",
        "order_currency": "USD"
    })
}

pub fn sample_event() -> OrderEvent {
    OrderEvent::from_value(sample_payload()).expect("sample payload should deserialize")
}

/// Order source backed by a fixed list of orders, newest last.
#[derive(Default)]
pub struct StubOrderSource {
    orders: Vec<(OrderRef, Value)>,
}

impl StubOrderSource {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_order(order: OrderRef, payload: Value) -> Self {
        Self {
            orders: vec![(order, payload)],
        }
    }
}

#[async_trait]
impl OrderSource for StubOrderSource {
    async fn package_event_data(
        &self,
        customer_id: &str,
        order_id: &str,
    ) -> Result<OrderEvent, ReceiptError> {
        let payload = self
            .orders
            .iter()
            .find(|(r, _)| r.customer_id == customer_id && r.order_id == order_id)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| ReceiptError::Validation(format!("unknown order: {}", order_id)))?;
        OrderEvent::from_value(payload)
    }

    async fn most_recent_order(&self) -> Option<OrderRef> {
        self.orders.last().map(|(r, _)| r.clone())
    }
}

/// Fully wired dispatcher over in-memory collaborators.
pub struct TestHarness {
    pub converter: Arc<MockDocumentConverter>,
    pub email: Arc<MockEmailSender>,
    pub dispatcher: ReceiptDispatcher,
}

impl TestHarness {
    pub fn new(config: MemoryConfigStore, orders: StubOrderSource) -> Self {
        Self::build(
            config,
            orders,
            MockDocumentConverter::new(),
            MockEmailSender::new(),
        )
    }

    pub fn with_failing_email(config: MemoryConfigStore, orders: StubOrderSource) -> Self {
        Self::build(
            config,
            orders,
            MockDocumentConverter::new(),
            MockEmailSender::failing(),
        )
    }

    pub fn with_failing_converter(config: MemoryConfigStore, orders: StubOrderSource) -> Self {
        Self::build(
            config,
            orders,
            MockDocumentConverter::failing(),
            MockEmailSender::new(),
        )
    }

    fn build(
        config: MemoryConfigStore,
        orders: StubOrderSource,
        converter: MockDocumentConverter,
        email: MockEmailSender,
    ) -> Self {
        let converter = Arc::new(converter);
        let email = Arc::new(email);
        let dispatcher = ReceiptDispatcher::new(
            Arc::new(config),
            Arc::new(orders),
            converter.clone(),
            email.clone(),
        );
        Self {
            converter,
            email,
            dispatcher,
        }
    }
}
