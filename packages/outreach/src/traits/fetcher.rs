//! Page fetcher trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::audit::SocialLinks;

/// Per-request fetch knobs. Retries are deliberately small: one for the
/// homepage, none for the speculative sub-page probes.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub retries: u32,
    /// Hard cap on extracted text length, in characters.
    pub max_chars: usize,
}

impl FetchOptions {
    /// Homepage fetch: patient, one retry.
    pub fn homepage() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            retries: 1,
            max_chars: 4_000,
        }
    }

    /// Sub-page probe: short timeout, no retry.
    pub fn subpage() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            retries: 0,
            max_chars: 4_000,
        }
    }
}

/// What came back from a fetch. `text: None` means the fetch or parse
/// failed after retries - fetchers never raise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub text: Option<String>,
    pub socials: SocialLinks,
}

impl FetchOutcome {
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Fetches a page and extracts visible text plus social/contact links.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, opts: FetchOptions) -> FetchOutcome;
}
