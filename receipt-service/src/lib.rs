//! receipt-service: billing receipt generation and email delivery.
//!
//! Maps a loosely-structured order payload into a validated receipt model,
//! renders the model into deterministic HTML markup, converts the markup to
//! a PDF through a converter capability, and hands the result to the host's
//! email transport. Invocation is purely programmatic: the host order
//! system calls [`ReceiptDispatcher::handle_payment_event`] on successful
//! payments and rebills, and the administration screen uses
//! [`ReceiptDispatcher::send_test`] / [`ReceiptDispatcher::resend_receipt`].

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;

pub use config::{BusinessProfile, ConfigStore, ReceiptSettings};
pub use error::ReceiptError;
pub use models::{OrderEvent, OrderRef, ReceiptModel};
pub use services::dispatch::{DispatchResponse, ReceiptDispatcher};
pub use services::providers::{DocumentConverter, EmailSender, OrderSource, ReceiptEmail};
