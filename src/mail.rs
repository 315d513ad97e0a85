//! Outbound mail seam.
//!
//! Account flows (verification, password reset) hand a rendered message to a
//! `Mailer`. The default implementation only logs, which keeps local
//! development and tests independent of an SMTP relay; a real transport plugs
//! in behind the same trait.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// Logs outbound mail instead of delivering it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        tracing::info!(to = %to, subject = %subject, body_len = html.len(), "outbound mail");
        Ok(())
    }
}
