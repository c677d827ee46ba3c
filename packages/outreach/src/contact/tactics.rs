//! The built-in contact resolution tiers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::contact::extract::extract_email;
use crate::contact::{ContactContext, ContactTactic};
use crate::traits::enricher::EmailEnricher;
use crate::traits::fetcher::{FetchOptions, PageFetcher};
use crate::traits::searcher::SearchProvider;

/// Sub-paths worth probing for a contact address, relative to the site root.
const CONTACT_PATHS: &[&str] = &[
    "/contact",
    "/about",
    "/contact-us",
    "/about-us",
    "/support",
    "/team",
    "/privacy",
];

/// Tier 1: pattern-extract from the text the caller already fetched.
pub struct InlineTextTactic;

#[async_trait]
impl ContactTactic for InlineTextTactic {
    fn name(&self) -> &'static str {
        "inline-text"
    }

    async fn attempt(&self, ctx: &ContactContext<'_>) -> Option<String> {
        extract_email(ctx.page_text?)
    }
}

/// Tier 2: probe likely sub-pages and extract per page, first hit wins.
pub struct SubPageTactic {
    fetcher: Arc<dyn PageFetcher>,
    paths: &'static [&'static str],
}

impl SubPageTactic {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            paths: CONTACT_PATHS,
        }
    }
}

#[async_trait]
impl ContactTactic for SubPageTactic {
    fn name(&self) -> &'static str {
        "sub-pages"
    }

    async fn attempt(&self, ctx: &ContactContext<'_>) -> Option<String> {
        let base = ctx.site_url.trim_end_matches('/');
        for path in self.paths {
            let url = format!("{base}{path}");
            debug!(target: "contact", %url, "probing sub-page for email");
            let outcome = self.fetcher.fetch(&url, FetchOptions::subpage()).await;
            if let Some(text) = outcome.text {
                if let Some(email) = extract_email(&text) {
                    return Some(email);
                }
            }
        }
        None
    }
}

/// Tiers 3 and 4: ask a search provider about the domain and extract from
/// the result snippets. Which tier this is depends only on which provider
/// it wraps.
pub struct SearchSnippetTactic {
    provider: Arc<dyn SearchProvider>,
}

impl SearchSnippetTactic {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ContactTactic for SearchSnippetTactic {
    fn name(&self) -> &'static str {
        "search-snippets"
    }

    async fn attempt(&self, ctx: &ContactContext<'_>) -> Option<String> {
        if ctx.domain.is_empty() {
            return None;
        }
        let query = format!("\"{}\" contact email", ctx.domain);
        match self.provider.search(&query, 0).await {
            Ok(page) => extract_email(&page.snippet_text()),
            Err(err) => {
                warn!(
                    target: "contact",
                    provider = self.provider.name(),
                    domain = ctx.domain,
                    %err,
                    "snippet search failed, falling through"
                );
                None
            }
        }
    }
}

/// Tier 5: commercial enrichment by domain.
pub struct EnrichmentTactic {
    enricher: Arc<dyn EmailEnricher>,
}

impl EnrichmentTactic {
    pub fn new(enricher: Arc<dyn EmailEnricher>) -> Self {
        Self { enricher }
    }
}

#[async_trait]
impl ContactTactic for EnrichmentTactic {
    fn name(&self) -> &'static str {
        "enrichment"
    }

    async fn attempt(&self, ctx: &ContactContext<'_>) -> Option<String> {
        if ctx.domain.is_empty() {
            return None;
        }
        self.enricher.enrich(ctx.domain).await
    }
}
