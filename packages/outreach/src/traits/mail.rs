//! Mail transport and mailbox reader traits.

use async_trait::async_trait;

use crate::error::MailError;

/// A file attached to an outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Dispatches outbound mail.
///
/// `Ok(true)` - delivered to the relay. `Ok(false)` - the relay refused the
/// dispatch (auth, bad recipient): an expected outcome, the record becomes
/// `Send Failed` and a future run retries. `Err` - unexpected transport
/// failure, the per-record boundary marks the record `Error`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<bool, MailError>;
}

/// Reads the shared inbox to detect replies.
#[async_trait]
pub trait MailboxReader: Send + Sync {
    /// Cheap connectivity check, run once at stage start. A failure here is
    /// stage-scoped: the reply pass returns without processing.
    async fn probe(&self) -> Result<(), MailError>;

    /// Whether any message from this address exists in the inbox.
    ///
    /// An `Err` means "could not check" - callers fail safe (assume a reply
    /// rather than risk a follow-up to someone who already answered).
    async fn has_reply_from(&self, address: &str) -> Result<bool, MailError>;

    /// Body of the most recent message from this address, if any.
    async fn latest_body_from(&self, address: &str) -> Option<String>;
}
