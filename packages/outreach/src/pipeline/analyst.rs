//! Analyst stage: scrape each unscanned lead, score the pain point, and
//! resolve a contact.

use std::sync::Arc;

use tracing::{debug, info};

use crate::contact::{ContactContext, ResolutionChain};
use crate::dedup::canonical_domain;
use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::state;
use crate::summarizers::PainPointEngine;
use crate::traits::fetcher::{FetchOptions, PageFetcher};
use crate::types::audit::{AuditRecord, AuditStatus};
use crate::types::lead::LeadStatus;
use crate::types::profile::{ClientProfile, ProfileBook};
use crate::types::ClientKey;

#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// Sub-pages scraped for extra context beyond the homepage.
    pub context_paths: Vec<String>,
    /// Hard cap on the combined site text handed to summarization and
    /// extraction, in characters.
    pub combined_cap: usize,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            context_paths: ["/services", "/about", "/about-us", "/faq"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            combined_cap: 12_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalystReport {
    pub scanned: usize,
    pub analyzed: usize,
    pub requires_dm: usize,
    pub use_form: usize,
    pub dead_ends: usize,
}

/// Per-lead analysis: fetch, summarize, resolve contact, record the audit.
pub struct Analyst {
    ledger: Arc<dyn LedgerStore>,
    fetcher: Arc<dyn PageFetcher>,
    pain: PainPointEngine,
    contacts: ResolutionChain,
    profiles: ProfileBook,
    config: AnalystConfig,
}

impl Analyst {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        fetcher: Arc<dyn PageFetcher>,
        pain: PainPointEngine,
        contacts: ResolutionChain,
        profiles: ProfileBook,
        config: AnalystConfig,
    ) -> Self {
        Self {
            ledger,
            fetcher,
            pain,
            contacts,
            profiles,
            config,
        }
    }

    /// Visit every `Unscanned` lead once. Already-processed rows are
    /// skipped untouched, so re-running over a fully processed store is a
    /// no-op - idempotent resume after a crash.
    pub async fn run(&self, client: &ClientKey) -> Result<AnalystReport> {
        let mut leads = self.ledger.load_leads(client).await?;
        info!(target: "analyst", rows = leads.len(), "loaded lead queue");

        let profile = self.profiles.get(client).clone();
        let mut report = AnalystReport::default();
        let mut new_audits: Vec<AuditRecord> = Vec::new();
        let mut updated = false;

        for lead in leads.iter_mut() {
            if lead.status != LeadStatus::Unscanned {
                continue;
            }
            report.scanned += 1;

            let audit = self.analyze_site(&lead.url, &profile).await;
            match audit.status {
                AuditStatus::Analyzed => report.analyzed += 1,
                AuditStatus::RequiresDm => report.requires_dm += 1,
                AuditStatus::UseForm => report.use_form += 1,
                _ => report.dead_ends += 1,
            }
            new_audits.push(audit);

            if state::advance_lead(lead, LeadStatus::Processed).is_ok() {
                updated = true;
            }
        }

        if !new_audits.is_empty() {
            self.ledger.append_audits(client, &new_audits).await?;
            info!(target: "analyst", created = new_audits.len(), "audit rows appended");
        }
        if updated {
            self.ledger.save_leads(client, &leads).await?;
            info!(target: "analyst", "lead statuses updated to Processed");
        }
        Ok(report)
    }

    async fn analyze_site(&self, url: &str, profile: &ClientProfile) -> AuditRecord {
        let homepage = self.fetcher.fetch(url, FetchOptions::homepage()).await;
        let socials = homepage.socials.clone();

        let Some(home_text) = homepage.text else {
            return AuditRecord::from_analysis(url, "Could not fetch site content", None, socials);
        };

        // Deep context: the homepage rarely says everything worth knowing.
        let mut combined = format!("--- HOMEPAGE ---\n{home_text}\n");
        let base = url.trim_end_matches('/');
        for path in &self.config.context_paths {
            let sub_url = format!("{base}{path}");
            debug!(target: "analyst", url = %sub_url, "scraping context sub-page");
            let sub = self.fetcher.fetch(&sub_url, FetchOptions::subpage()).await;
            if let Some(sub_text) = sub.text {
                combined.push_str(&format!("--- {} ---\n{sub_text}\n", path.to_uppercase()));
            }
        }
        if let Some((idx, _)) = combined.char_indices().nth(self.config.combined_cap) {
            combined.truncate(idx);
        }

        let pain = self.pain.pain_point(&combined, profile).await;

        let domain = canonical_domain(url);
        let ctx = ContactContext {
            site_url: url,
            domain: &domain,
            page_text: Some(&combined),
        };
        let email = self.contacts.resolve(&ctx).await;

        AuditRecord::from_analysis(url, pain, email, socials)
    }
}
