//! Email transport implementations.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Mutex;

use super::{EmailSender, ReceiptEmail};
use crate::error::ReceiptError;

/// SMTP connection settings for the production sender.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

/// Production sender delivering over SMTP with the receipt attached.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    pub fn new(settings: &SmtpSettings) -> Result<Self, ReceiptError> {
        let creds = Credentials::new(settings.user.clone(), settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| ReceiptError::Delivery(format!("Failed to create SMTP relay: {}", e)))?
            .port(settings.port)
            .credentials(creds)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, email: &ReceiptEmail) -> Result<(), ReceiptError> {
        let from = mailbox(email.from_name.as_deref(), &email.from_address)?;
        let to = mailbox(Some(email.to_name.as_str()), &email.to_address)?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject);

        for address in &email.cc {
            builder = builder.cc(mailbox(None, address)?);
        }

        let body = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(email.body.clone());

        let message = match &email.attachment {
            Some(attachment) => {
                let bytes = tokio::fs::read(&attachment.path).await?;
                let content_type = ContentType::parse("application/pdf").map_err(|e| {
                    ReceiptError::Delivery(format!("Invalid attachment content type: {}", e))
                })?;
                builder.multipart(
                    MultiPart::mixed().singlepart(body).singlepart(
                        Attachment::new(attachment.filename.clone()).body(bytes, content_type),
                    ),
                )
            }
            None => builder.multipart(MultiPart::mixed().singlepart(body)),
        }
        .map_err(|e| ReceiptError::Delivery(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| ReceiptError::Delivery(format!("Failed to send email: {}", e)))?;

        if !email.disable_logging {
            tracing::info!(
                to = %email.to_address,
                subject = %email.subject,
                "Email sent successfully"
            );
        }

        Ok(())
    }
}

fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, ReceiptError> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let rendered = match name {
        Some(name) => format!("{} <{}>", name, address),
        None => address.to_string(),
    };
    rendered
        .parse()
        .map_err(|e| ReceiptError::Delivery(format!("Invalid address {}: {}", address, e)))
}

/// Mock sender for tests: records outgoing mail instead of delivering it.
#[derive(Default)]
pub struct MockEmailSender {
    sent: Mutex<Vec<ReceiptEmail>>,
    fail: bool,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every send fails, for exercising delivery errors.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<ReceiptEmail> {
        self.sent.lock().expect("mock email log poisoned").clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, email: &ReceiptEmail) -> Result<(), ReceiptError> {
        self.sent
            .lock()
            .expect("mock email log poisoned")
            .push(email.clone());

        if self.fail {
            return Err(ReceiptError::Delivery("mock delivery failure".to_string()));
        }

        tracing::info!(
            to = %email.to_address,
            subject = %email.subject,
            "[MOCK] Email would be sent"
        );

        Ok(())
    }
}
