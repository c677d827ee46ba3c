//! Best-effort pain-point summarizer trait.

use async_trait::async_trait;

use crate::types::profile::ClientProfile;

/// Produces a single-sentence pain-point summary from scraped site text.
///
/// Best-effort: `None` on any failure (model unavailable, transport error,
/// empty output) - the caller falls back to the deterministic heuristic and
/// always ends up with a string.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, site_text: &str, profile: &ClientProfile) -> Option<String>;
}
