//! Reply-intent classification trait.

use async_trait::async_trait;

use crate::types::audit::AuditStatus;

/// What a reply means for the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyIntent {
    HotLead,
    NotInterested,
    Dead,
    /// Default bucket for unclear or unclassifiable replies.
    Replied,
}

impl ReplyIntent {
    /// The audit status this intent transitions the record to.
    pub fn as_status(&self) -> AuditStatus {
        match self {
            ReplyIntent::HotLead => AuditStatus::HotLead,
            ReplyIntent::NotInterested => AuditStatus::NotInterested,
            ReplyIntent::Dead => AuditStatus::Dead,
            ReplyIntent::Replied => AuditStatus::Replied,
        }
    }
}

/// Classifies a reply body into exactly one intent.
///
/// Implementations must default to [`ReplyIntent::Replied`] for ambiguous
/// or unrecognized input - classification never blocks a transition.
#[async_trait]
pub trait ReplyClassifier: Send + Sync {
    async fn classify(&self, body: &str) -> ReplyIntent;
}
