//! Scout stage: lead discovery through the provider fallback chain.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dedup::{canonical_domain, DomainSet};
use crate::error::{PipelineError, Result};
use crate::ledger::LedgerStore;
use crate::traits::searcher::SearchProvider;
use crate::types::lead::LeadRecord;
use crate::types::ClientKey;

/// Directory, aggregator, and social hosts that are never leads - matched
/// as substrings of the canonical domain.
pub const DIRECTORY_BLACKLIST: &[&str] = &[
    "yelp",
    "yellowpages",
    "crunchbase",
    "thumbtack",
    "bbb.org",
    "facebook",
    "linkedin",
    "angi",
    "homeadvisor",
    "porch",
];

#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// How many fresh leads a run aims for.
    pub target_count: usize,
    /// Safety ceiling on pages per provider tier - bounds unbounded
    /// pagination against API cost and rate limits.
    pub max_pages: u32,
    pub blacklist: Vec<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            target_count: 10,
            max_pages: 5,
            blacklist: DIRECTORY_BLACKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScoutConfig {
    pub fn with_target(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }
}

/// What a discovery run did, for the operator's dashboard line.
#[derive(Debug, Clone, Default)]
pub struct ScoutReport {
    pub accepted: usize,
    pub pages_queried: u32,
    pub known_domains: usize,
    pub tiers_attempted: Vec<String>,
}

/// The discovery fallback chain over an ordered list of search providers.
pub struct Scout {
    ledger: Arc<dyn LedgerStore>,
    providers: Vec<Arc<dyn SearchProvider>>,
    config: ScoutConfig,
}

impl Scout {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        providers: Vec<Arc<dyn SearchProvider>>,
        config: ScoutConfig,
    ) -> Self {
        Self {
            ledger,
            providers,
            config,
        }
    }

    /// The discovery query: niche and location quoted, directory sites
    /// excluded at the engine where supported.
    pub fn build_query(niche: &str, location: &str) -> String {
        format!(
            "\"{niche}\" \"{location}\" -site:yelp.com -site:bbb.org -site:facebook.com \
             -site:linkedin.com -site:yellowpages.com -site:angi.com"
        )
    }

    fn is_blacklisted(&self, domain: &str) -> bool {
        self.config.blacklist.iter().any(|term| domain.contains(term))
    }

    /// Discover up to `target_count` fresh leads for a niche/location and
    /// append them to the client's lead store.
    ///
    /// Provider tiers are attempted in order; a tier is escalated past only
    /// when it errors or accepts nothing. Whatever happens, the lead store
    /// exists afterward so downstream stages never trip over a missing file.
    pub async fn run(
        &self,
        niche: &str,
        location: &str,
        client: &ClientKey,
    ) -> Result<ScoutReport> {
        if self.providers.is_empty() {
            return Err(PipelineError::Config("no search providers configured"));
        }

        let mut known = DomainSet::load(self.ledger.as_ref(), client).await?;
        let mut report = ScoutReport {
            known_domains: known.len(),
            ..Default::default()
        };
        if !known.is_empty() {
            info!(target: "scout", known = known.len(), "loaded known domains to skip");
        }

        let query = Self::build_query(niche, location);
        info!(target: "scout", %query, "starting lead search");

        let target = self.config.target_count;
        let mut accepted: Vec<LeadRecord> = Vec::new();

        for provider in &self.providers {
            if accepted.len() >= target {
                break;
            }
            report.tiers_attempted.push(provider.name().to_string());
            let tier_start = accepted.len();
            let mut tier_errored = false;

            for page in 0..self.config.max_pages {
                if accepted.len() >= target {
                    break;
                }
                let results = match provider.search(&query, page).await {
                    Ok(results) => results,
                    Err(err) => {
                        warn!(
                            target: "scout",
                            provider = provider.name(),
                            page,
                            %err,
                            "provider error, escalating to next tier"
                        );
                        tier_errored = true;
                        break;
                    }
                };
                report.pages_queried += 1;
                if results.is_empty() {
                    debug!(target: "scout", provider = provider.name(), page, "no more results");
                    break;
                }

                for hit in results.candidates() {
                    if accepted.len() >= target {
                        break;
                    }
                    let domain = canonical_domain(&hit.url);
                    if domain.is_empty() {
                        debug!(target: "scout", url = %hit.url, "no domain identity, rejecting");
                        continue;
                    }
                    if self.is_blacklisted(&domain) {
                        continue;
                    }
                    if known.contains(&domain) {
                        debug!(target: "scout", %domain, "already in system, skipping");
                        continue;
                    }
                    known.insert(&domain);
                    info!(target: "scout", url = %hit.url, "lead found");
                    accepted.push(LeadRecord::unscanned(hit.url.clone()));
                }
            }

            let tier_accepted = accepted.len() - tier_start;
            if !tier_errored && tier_accepted > 0 {
                // The tier worked; a short page is the end of the well, not
                // a reason to spend the next provider's quota.
                break;
            }
        }

        if accepted.len() < target {
            warn!(
                target: "scout",
                found = accepted.len(),
                target,
                "search exhausted before reaching target"
            );
        }

        // Even a zero-lead run must leave a valid store behind.
        self.ledger.append_leads(client, &accepted).await?;
        report.accepted = accepted.len();
        info!(target: "scout", accepted = report.accepted, "discovery run complete");
        Ok(report)
    }
}
