use async_trait::async_trait;

/// Mail delivery failure; the caller decides whether it is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mail delivery failed: {message}")]
pub struct MailError {
    /// Transport-level detail.
    pub message: String,
}

/// Sends plain-text transactional mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message to `to`.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}
