//! Services module for receipt-service.

pub mod currency;
pub mod dispatch;
pub mod mapper;
pub mod providers;
pub mod renderer;

pub use dispatch::{DispatchResponse, ReceiptDispatcher};
