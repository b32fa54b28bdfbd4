//! Markup-to-document conversion implementations.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::DocumentConverter;
use crate::error::ReceiptError;

/// Converter that pipes markup through an external command reading HTML on
/// stdin and writing the document to stdout (e.g. `wkhtmltopdf - -`).
pub struct HtmlPdfCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl HtmlPdfCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl DocumentConverter for HtmlPdfCommand {
    async fn convert(&self, markup: &str) -> Result<Vec<u8>, ReceiptError> {
        tracing::debug!(
            program = %self.program,
            timeout_secs = %self.timeout.as_secs(),
            markup_size = markup.len(),
            "Converting receipt markup"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReceiptError::Conversion(format!("Failed to spawn {}: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(markup.as_bytes()).await.map_err(|e| {
                ReceiptError::Conversion(format!("Failed to write markup: {}", e))
            })?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ReceiptError::Conversion(format!(
                    "Command timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ReceiptError::Conversion(format!("Command failed to run: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                program = %self.program,
                stderr = %stderr,
                "Conversion command failed"
            );
            return Err(ReceiptError::Conversion(format!(
                "Command failed: {}",
                stderr
            )));
        }

        tracing::debug!(
            program = %self.program,
            output_size = output.stdout.len(),
            "Conversion succeeded"
        );

        Ok(output.stdout)
    }
}

/// Mock converter for tests: counts conversions and returns canned bytes.
#[derive(Default)]
pub struct MockDocumentConverter {
    calls: AtomicUsize,
    fail: bool,
}

impl MockDocumentConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter whose every conversion fails.
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn conversions(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentConverter for MockDocumentConverter {
    async fn convert(&self, markup: &str) -> Result<Vec<u8>, ReceiptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ReceiptError::Conversion(
                "mock conversion failure".to_string(),
            ));
        }

        Ok(format!("%PDF-1.4\n%{} bytes of markup\n", markup.len()).into_bytes())
    }
}
