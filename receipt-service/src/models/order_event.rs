//! Raw order-event payload types.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ReceiptError;

/// One line item from the order's serialized product list.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineItem {
    pub name: String,
}

/// Loosely-structured order event as packaged by the host commerce system.
///
/// Every field is optional at this layer; the mapper decides which ones a
/// receipt actually requires. Amount fields may arrive as JSON numbers or
/// strings depending on the upstream serializer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderEvent {
    pub event_type: Option<String>,
    pub member_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub billing_address: Option<String>,
    pub billing_address2: Option<String>,
    pub billing_city: Option<String>,
    pub billing_state: Option<String>,
    pub billing_zip_code: Option<String>,
    pub billing_country: Option<String>,
    /// JSON-serialized, ordered list of purchased line items.
    pub order_products: Option<String>,
    pub order_subtotal: Option<Value>,
    pub order_discount: Option<Value>,
    pub order_shipping: Option<Value>,
    pub order_total: Option<Value>,
    pub order_number: Option<String>,
    pub order_currency: Option<String>,
    /// Administrator-defined custom fields, keyed `cf_<field id>`.
    #[serde(flatten)]
    custom_fields: HashMap<String, Value>,
}

impl OrderEvent {
    /// Deserialize a raw payload as delivered to the host's payment hook.
    pub fn from_value(payload: Value) -> Result<Self, ReceiptError> {
        serde_json::from_value(payload)
            .map_err(|e| ReceiptError::MalformedPayload(format!("invalid order event: {}", e)))
    }

    /// Resolve an administrator-defined custom field by its configured id.
    pub fn custom_field(&self, field_id: &str) -> Option<&str> {
        self.custom_fields
            .get(&format!("cf_{}", field_id))
            .and_then(Value::as_str)
    }
}

/// Reference to an existing order, used for test sends and manual resends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRef {
    pub customer_id: String,
    pub order_id: String,
}

impl OrderRef {
    pub fn new(customer_id: impl Into<String>, order_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            order_id: order_id.into(),
        }
    }

    /// A usable reference carries both a customer id and an order id.
    pub fn is_valid(&self) -> bool {
        !self.customer_id.is_empty() && !self.order_id.is_empty()
    }
}
