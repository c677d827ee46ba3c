//! Domain identity and the "Ironclad Ledger" known-domain set.
//!
//! A lead's deduplication key is its canonical domain: lowercased host with
//! a leading `www.` stripped. The [`DomainSet`] is the in-memory union of
//! every domain a client has ever seen across both stores - rebuilt at the
//! start of each discovery run and mutated in place as leads are accepted,
//! so acceptances are visible to later checks in the same run without a
//! store round-trip.

use std::collections::HashSet;

use crate::error::StoreResult;
use crate::ledger::LedgerStore;
use crate::types::ClientKey;

/// Canonical domain identity for a URL.
///
/// Returns an empty string for unparseable input - empty means "no
/// identity": it is never inserted into a [`DomainSet`] and never matches
/// one, so callers must not rely on dedup for such URLs.
pub fn canonical_domain(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let parsed = match url::Url::parse(trimmed) {
        Ok(u) => Some(u),
        // Bare hosts like "acme-roof.com" come through the enrichment path.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(&format!("http://{trimmed}")).ok()
        }
        Err(_) => None,
    };
    let Some(parsed) = parsed else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };
    let host = host.to_ascii_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// The set of domains already known to a client.
#[derive(Debug, Default, Clone)]
pub struct DomainSet {
    domains: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of canonical domains from every URL-bearing record in both of
    /// the client's stores.
    pub async fn load(ledger: &dyn LedgerStore, client: &ClientKey) -> StoreResult<Self> {
        let mut set = Self::new();
        for lead in ledger.load_leads(client).await? {
            set.insert(&canonical_domain(&lead.url));
        }
        for audit in ledger.load_audits(client).await? {
            set.insert(&canonical_domain(&audit.url));
        }
        Ok(set)
    }

    /// Insert a canonical domain. Empty identities are ignored.
    ///
    /// Returns true when the domain was not already present.
    pub fn insert(&mut self, domain: &str) -> bool {
        if domain.is_empty() {
            return false;
        }
        self.domains.insert(domain.to_string())
    }

    /// Whether a canonical domain is already known. Empty never matches.
    pub fn contains(&self, domain: &str) -> bool {
        !domain.is_empty() && self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
