//! Error types for receipt-service.

use thiserror::Error;

/// Failures raised by the receipt generation pipeline.
///
/// Incomplete configuration is deliberately not represented here: it routes
/// the pipeline to a skip outcome rather than a failure.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A required field could not be derived from the order payload.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The order payload was absent, unparsable, or structurally wrong.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Markup-to-document conversion failed.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The email transport rejected or failed to send the message.
    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
