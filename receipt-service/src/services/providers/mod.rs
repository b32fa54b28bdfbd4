//! Capability interfaces to the host system's collaborators.

pub mod email;
pub mod pdf;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::ReceiptError;
use crate::models::{OrderEvent, OrderRef};

pub use email::{MockEmailSender, SmtpEmailSender, SmtpSettings};
pub use pdf::{HtmlPdfCommand, MockDocumentConverter};

/// Source of order data in the host commerce system.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Package the event payload for one order, exactly as the host would
    /// for a payment hook.
    async fn package_event_data(
        &self,
        customer_id: &str,
        order_id: &str,
    ) -> Result<OrderEvent, ReceiptError>;

    /// The most recently placed order, if any orders exist.
    async fn most_recent_order(&self) -> Option<OrderRef>;
}

/// Converts rendered receipt markup into a binary document.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, markup: &str) -> Result<Vec<u8>, ReceiptError>;
}

/// Binary document attached to the delivery email.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub path: PathBuf,
}

/// Outgoing receipt email assembled by the dispatcher. Subject and body are
/// template text expanded by the host transport; `is_rebill` feeds the
/// host's template context.
#[derive(Debug, Clone)]
pub struct ReceiptEmail {
    pub from_name: Option<String>,
    pub from_address: String,
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
    pub cc: Vec<String>,
    pub attachment: Option<EmailAttachment>,
    pub is_rebill: bool,
    /// Set for administrative test sends, which must leave no trace in the
    /// host's delivery log.
    pub disable_logging: bool,
}

/// Email transport capability.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &ReceiptEmail) -> Result<(), ReceiptError>;
}
