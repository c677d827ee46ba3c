//! Contact resolution: an ordered waterfall of email-finding tactics.
//!
//! Tiers are data, not code - the chain iterates whatever tactics it was
//! built with and short-circuits on the first success. Every tactic
//! failure, including a provider error, is a `None`; the chain's overall
//! result is `None` only when all tiers exhaust.

pub mod extract;
pub mod tactics;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::traits::enricher::EmailEnricher;
use crate::traits::fetcher::PageFetcher;
use crate::traits::searcher::SearchProvider;

pub use extract::extract_email;
pub use tactics::{EnrichmentTactic, InlineTextTactic, SearchSnippetTactic, SubPageTactic};

/// What a tactic has to work with: the site, its canonical domain, and any
/// text already fetched by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ContactContext<'a> {
    pub site_url: &'a str,
    pub domain: &'a str,
    pub page_text: Option<&'a str>,
}

/// One email-finding tactic. Failure is `None`, never an error.
#[async_trait]
pub trait ContactTactic: Send + Sync {
    fn name(&self) -> &'static str;
    async fn attempt(&self, ctx: &ContactContext<'_>) -> Option<String>;
}

/// Ordered tactics, attempted until the first success.
pub struct ResolutionChain {
    tactics: Vec<Arc<dyn ContactTactic>>,
}

impl ResolutionChain {
    pub fn new(tactics: Vec<Arc<dyn ContactTactic>>) -> Self {
        Self { tactics }
    }

    /// The full five-tier waterfall: inline text, sub-page probes, snippet
    /// extraction per search provider, then domain enrichment.
    pub fn standard(
        fetcher: Arc<dyn PageFetcher>,
        searchers: Vec<Arc<dyn SearchProvider>>,
        enricher: Option<Arc<dyn EmailEnricher>>,
    ) -> Self {
        let mut tactics: Vec<Arc<dyn ContactTactic>> = vec![
            Arc::new(InlineTextTactic),
            Arc::new(SubPageTactic::new(fetcher)),
        ];
        for searcher in searchers {
            tactics.push(Arc::new(SearchSnippetTactic::new(searcher)));
        }
        if let Some(enricher) = enricher {
            tactics.push(Arc::new(EnrichmentTactic::new(enricher)));
        }
        Self::new(tactics)
    }

    /// Enrichment-only chain, used by the outreach stage for records that
    /// drifted in without an address.
    pub fn enrichment_only(enricher: Arc<dyn EmailEnricher>) -> Self {
        Self::new(vec![Arc::new(EnrichmentTactic::new(enricher))])
    }

    /// Attempt each tier in order, stopping at the first resolved address.
    pub async fn resolve(&self, ctx: &ContactContext<'_>) -> Option<String> {
        for tactic in &self.tactics {
            if let Some(email) = tactic.attempt(ctx).await {
                info!(
                    target: "contact",
                    tactic = tactic.name(),
                    domain = ctx.domain,
                    "resolved contact email"
                );
                return Some(email);
            }
        }
        None
    }
}
