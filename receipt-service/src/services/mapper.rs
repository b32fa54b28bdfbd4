//! Order-event to receipt-model mapping.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::config::CustomFieldIds;
use crate::error::ReceiptError;
use crate::models::{OrderEvent, OrderLineItem, ReceiptEvent, ReceiptModel};

/// Per-generation delivery overrides supplied by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct DeliveryContext {
    pub is_test_send: bool,
    /// Recipient override for administrative test sends.
    pub test_recipient: Option<String>,
    /// Extra CC address supplied on manual resend requests.
    pub additional_cc_email: Option<String>,
}

/// Map a raw order event into a validated [`ReceiptModel`].
///
/// Fails when the member id, email, order number or product name cannot be
/// derived. A CC address that fails syntax validation is dropped silently
/// rather than failing the mapping.
pub fn map_event(
    event: &OrderEvent,
    custom_fields: &CustomFieldIds,
    delivery: &DeliveryContext,
) -> Result<ReceiptModel, ReceiptError> {
    let member_id = required(event.member_id.as_deref(), "member_id")?;
    let email = required(event.email.as_deref(), "email")?;
    let order_number = required(event.order_number.as_deref(), "order_number")?;
    let product_name = first_product_name(event.order_products.as_deref())?;

    let extra_info = custom_fields
        .billing_notes
        .as_deref()
        .and_then(|id| event.custom_field(id))
        .map(newlines_to_breaks)
        .filter(|v| !v.is_empty());

    let cc_email = custom_fields
        .cc_email
        .as_deref()
        .and_then(|id| event.custom_field(id))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|candidate| {
            if is_valid_email(candidate) {
                Some(candidate.to_string())
            } else {
                tracing::debug!(order_number = %order_number, "Dropping invalid CC address");
                None
            }
        });

    Ok(ReceiptModel {
        event: ReceiptEvent::from_event_type(event.event_type.as_deref().unwrap_or("")),
        member_id,
        first_name: event.first_name.clone().unwrap_or_default(),
        last_name: event.last_name.clone().unwrap_or_default(),
        email,
        cc_email,
        address1: present(event.billing_address.as_deref()),
        address2: present(event.billing_address2.as_deref()),
        city: present(event.billing_city.as_deref()),
        state: present(event.billing_state.as_deref()),
        zip: present(event.billing_zip_code.as_deref()),
        country: present(event.billing_country.as_deref()),
        extra_info,
        product_name,
        currency_code: present(event.order_currency.as_deref()),
        subtotal: parse_amount(event.order_subtotal.as_ref()),
        discount: parse_amount(event.order_discount.as_ref()),
        shipping: parse_amount(event.order_shipping.as_ref()),
        total: parse_amount(event.order_total.as_ref()),
        order_number,
        is_test_send: delivery.is_test_send,
        additional_cc_email: delivery.additional_cc_email.clone(),
    })
}

fn required(value: Option<&str>, field: &str) -> Result<String, ReceiptError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ReceiptError::Validation(format!(
            "missing required field: {}",
            field
        ))),
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The order carries its line items as a JSON-serialized, ordered list; the
/// receipt names the first item.
fn first_product_name(raw: Option<&str>) -> Result<String, ReceiptError> {
    let raw = raw.ok_or_else(|| {
        ReceiptError::MalformedPayload("order_products is missing".to_string())
    })?;
    let items: Vec<OrderLineItem> = serde_json::from_str(raw).map_err(|e| {
        ReceiptError::MalformedPayload(format!("order_products is not a line-item list: {}", e))
    })?;
    let first = items.into_iter().next().ok_or_else(|| {
        ReceiptError::MalformedPayload("order_products contains no line items".to_string())
    })?;

    let name = first.name.trim().to_string();
    if name.is_empty() {
        return Err(ReceiptError::Validation(
            "missing required field: product name".to_string(),
        ));
    }
    Ok(name)
}

/// Amounts arrive as JSON numbers or strings; anything unparsable counts as
/// not present.
fn parse_amount(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Convert payload newlines to the renderer's line-break convention.
/// `\r\n`, lone `\n` and lone `\r` all count as line terminators.
fn newlines_to_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br />\n")
}

/// Lenient syntactic check, mirroring the host's own address validation.
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 255 {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
