//! Receipt pipeline orchestration.

use chrono::Local;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use crate::config::{ConfigStore, ReceiptSettings};
use crate::error::ReceiptError;
use crate::models::{OrderEvent, OrderRef, ReceiptModel};
use crate::services::mapper::{map_event, DeliveryContext};
use crate::services::providers::{
    DocumentConverter, EmailAttachment, EmailSender, OrderSource, ReceiptEmail,
};
use crate::services::renderer::{date_paid_label, render_receipt};

/// Result of an administrator-triggered dispatch operation.
#[derive(Debug, Clone)]
pub struct DispatchResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl DispatchResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineOutcome {
    /// Required configuration is incomplete; generation is a no-op.
    Skipped,
    /// Receipt rendered, converted and handed to the email transport.
    Delivered,
}

/// Sequences one receipt generation: configuration check, data mapping,
/// rendering, document conversion, email delivery, artifact cleanup.
///
/// Collaborators are injected at construction; one dispatcher can serve any
/// number of concurrent generations since it holds no mutable state.
pub struct ReceiptDispatcher {
    config: Arc<dyn ConfigStore>,
    orders: Arc<dyn OrderSource>,
    converter: Arc<dyn DocumentConverter>,
    email: Arc<dyn EmailSender>,
}

impl ReceiptDispatcher {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        orders: Arc<dyn OrderSource>,
        converter: Arc<dyn DocumentConverter>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            orders,
            converter,
            email,
        }
    }

    /// Entry point for the host's payment hook, fired on successful initial
    /// payments and rebills.
    ///
    /// Never propagates failures: receipt generation must not disrupt the
    /// order-processing flow that triggered it. This is the single boundary
    /// where pipeline errors are logged and discarded.
    #[instrument(skip(self, event))]
    pub async fn handle_payment_event(&self, event: OrderEvent) {
        if let Err(e) = self.process(event, DeliveryContext::default()).await {
            tracing::error!(error = %e, "Receipt generation failed for payment event");
        }
    }

    /// Generate a receipt from the most recent order and deliver it to the
    /// given address, marked as a test.
    #[instrument(skip(self))]
    pub async fn send_test(&self, target_email: &str) -> DispatchResponse {
        let order = match self.orders.most_recent_order().await {
            Some(order) => order,
            None => return DispatchResponse::failure("at least one order is required"),
        };

        let event = match self
            .orders
            .package_event_data(&order.customer_id, &order.order_id)
            .await
        {
            Ok(event) => event,
            Err(e) => return DispatchResponse::failure(e.to_string()),
        };

        let delivery = DeliveryContext {
            is_test_send: true,
            test_recipient: Some(target_email.to_string()),
            additional_cc_email: None,
        };

        match self.process(event, delivery).await {
            Ok(_) => DispatchResponse::success(),
            Err(e) => DispatchResponse::failure(e.to_string()),
        }
    }

    /// Re-run the pipeline for an existing order, optionally copying an
    /// extra address supplied by the administrator.
    #[instrument(skip(self, order))]
    pub async fn resend_receipt(
        &self,
        order: &OrderRef,
        additional_cc_email: Option<&str>,
    ) -> DispatchResponse {
        if !order.is_valid() {
            return DispatchResponse::failure(
                "Unable to resend receipt. A valid order is required.",
            );
        }

        let event = match self
            .orders
            .package_event_data(&order.customer_id, &order.order_id)
            .await
        {
            Ok(event) => event,
            Err(e) => return DispatchResponse::failure(e.to_string()),
        };

        let delivery = DeliveryContext {
            is_test_send: false,
            test_recipient: None,
            additional_cc_email: additional_cc_email
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        };

        match self.process(event, delivery).await {
            Ok(_) => DispatchResponse::success(),
            Err(e) => DispatchResponse::failure(e.to_string()),
        }
    }

    async fn process(
        &self,
        event: OrderEvent,
        delivery: DeliveryContext,
    ) -> Result<PipelineOutcome, ReceiptError> {
        // 1. Verify all required configuration is present
        let settings = match ReceiptSettings::load(self.config.as_ref()) {
            Some(settings) => settings,
            None => {
                tracing::info!("Receipt configuration incomplete, skipping generation");
                return Ok(PipelineOutcome::Skipped);
            }
        };

        // 2. Map the raw payload into a validated receipt model
        let model = map_event(&event, &settings.custom_fields, &delivery)?;

        tracing::info!(
            order_number = %model.order_number,
            member_id = %model.member_id,
            is_test = model.is_test_send,
            "Generating receipt"
        );

        // 3. Render the receipt markup
        let today = date_paid_label(Local::now().date_naive());
        let markup = render_receipt(&model, &settings.profile, &today);

        // 4. Convert to the deliverable document
        let document = self.converter.convert(&markup).await?;

        // 5. Stage the document in a temp file removed on every exit path
        let prefix = format!("{}_", artifact_stem(&model));
        let mut artifact = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".pdf")
            .tempfile()?;
        artifact.write_all(&document)?;
        artifact.flush()?;

        // 6. Hand off to the email transport
        let message = build_email(&model, &settings, &delivery, artifact.path());
        let disable_logging = message.disable_logging;
        self.email.send(&message).await?;

        if !disable_logging {
            tracing::info!(
                order_number = %model.order_number,
                to = %message.to_address,
                "Receipt delivered"
            );
        }

        Ok(PipelineOutcome::Delivered)
    }
}

fn artifact_stem(model: &ReceiptModel) -> String {
    if model.is_test_send {
        format!("test_billing_receipt_{}", model.order_number)
    } else {
        format!("billing_receipt_{}", model.order_number)
    }
}

fn build_email(
    model: &ReceiptModel,
    settings: &ReceiptSettings,
    delivery: &DeliveryContext,
    artifact: &Path,
) -> ReceiptEmail {
    let mut cc = Vec::new();
    if let Some(address) = &model.cc_email {
        cc.push(address.clone());
    }
    if let Some(address) = &model.additional_cc_email {
        cc.push(address.clone());
    }

    let (to_address, subject, disable_logging) = if model.is_test_send {
        (
            delivery
                .test_recipient
                .clone()
                .unwrap_or_else(|| model.email.clone()),
            format!("[TEST] {}", settings.email.subject),
            true,
        )
    } else {
        (model.email.clone(), settings.email.subject.clone(), false)
    };

    ReceiptEmail {
        from_name: settings.email.from_name.clone(),
        from_address: settings.email.from_address.clone(),
        to_name: model.first_name.clone(),
        to_address,
        subject,
        body: settings.email.body.clone(),
        cc,
        attachment: Some(EmailAttachment {
            filename: format!("{}.pdf", artifact_stem(model)),
            path: artifact.to_path_buf(),
        }),
        is_rebill: model.event.is_rebill(),
        disable_logging,
    }
}
