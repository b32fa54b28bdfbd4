//! Receipt model for receipt-service.

use rust_decimal::Decimal;
use serde::Serialize;

/// Payment trigger that caused a receipt to be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptEvent {
    NewPurchase,
    Rebill,
}

impl ReceiptEvent {
    /// Classify the host's event-type marker. Anything that is not a rebill
    /// counts as an initial purchase.
    pub fn from_event_type(event_type: &str) -> Self {
        match event_type {
            "payment_rebill" => ReceiptEvent::Rebill,
            _ => ReceiptEvent::NewPurchase,
        }
    }

    pub fn is_rebill(&self) -> bool {
        matches!(self, ReceiptEvent::Rebill)
    }
}

/// Validated receipt data for one generation request.
///
/// Constructed fresh per receipt, rendered exactly once, then discarded.
/// After mapping, `member_id`, `email`, `product_name` and `order_number`
/// are always non-empty, and `cc_email` is either absent or a
/// syntactically valid address.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptModel {
    pub event: ReceiptEvent,
    pub member_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cc_email: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    /// Pre-formatted billing block that replaces the name/email/address
    /// section when present.
    pub extra_info: Option<String>,
    pub product_name: String,
    pub currency_code: Option<String>,
    pub subtotal: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub total: Option<Decimal>,
    pub order_number: String,
    pub is_test_send: bool,
    pub additional_cc_email: Option<String>,
}
