//! Deterministic keyword-based reply classification.

use async_trait::async_trait;

use crate::traits::classifier::{ReplyClassifier, ReplyIntent};

const NOT_INTERESTED: &[&str] = &[
    "not interested",
    "no thanks",
    "no thank you",
    "unsubscribe",
    "remove me",
    "stop emailing",
    "do not contact",
];

const DEAD: &[&str] = &[
    "undeliverable",
    "delivery failed",
    "address not found",
    "mailbox full",
    "no longer with",
    "wrong address",
    "out of business",
];

const HOT: &[&str] = &[
    "interested",
    "call me",
    "let's talk",
    "lets talk",
    "schedule",
    "meeting",
    "sounds good",
    "tell me more",
    "send over",
];

/// Keyword classifier. Negative signals are checked before positive ones -
/// "not interested" must never read as interest - and anything unmatched
/// defaults to the plain `Replied` bucket.
pub struct KeywordClassifier;

#[async_trait]
impl ReplyClassifier for KeywordClassifier {
    async fn classify(&self, body: &str) -> ReplyIntent {
        let s = body.to_lowercase();
        if NOT_INTERESTED.iter().any(|k| s.contains(k)) {
            return ReplyIntent::NotInterested;
        }
        if DEAD.iter().any(|k| s.contains(k)) {
            return ReplyIntent::Dead;
        }
        if HOT.iter().any(|k| s.contains(k)) {
            return ReplyIntent::HotLead;
        }
        ReplyIntent::Replied
    }
}
