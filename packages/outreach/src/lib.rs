//! Lead Discovery, Analysis, and Outreach Pipeline
//!
//! A four-stage sales-automation pipeline over CSV-backed, per-client
//! ledgers: Scout discovers candidate business sites, Analyst scrapes and
//! scores them, Sniper dispatches personalized outreach, Closer watches for
//! replies and follows up once.
//!
//! # Design Philosophy
//!
//! **"Never contact anyone twice"**
//!
//! - One dedup identity: the canonical domain, unique across a client's
//!   combined lead and audit history
//! - One send guard: session-scoped and history-scoped, so an address is
//!   mailed at most once ever
//! - Closed status enums with a single transition table - stages cannot
//!   invent edges
//! - Fallback chains as data: provider tiers and contact tactics are
//!   ordered lists of strategy objects, not nested conditionals
//! - Expected failures degrade to "no result"; only missing configuration
//!   stops a stage
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use outreach::{CsvLedger, Scout, ScoutConfig, SerpApiClient, DuckDuckGoClient};
//! use outreach::types::ClientKey;
//!
//! let ledger = Arc::new(CsvLedger::new("data"));
//! let scout = Scout::new(
//!     ledger,
//!     vec![
//!         Arc::new(SerpApiClient::new(serp_key)),
//!         Arc::new(DuckDuckGoClient::new()),
//!     ],
//!     ScoutConfig::default(),
//! );
//! let report = scout.run("Roofing", "Denver", &ClientKey::new("acme")).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (search, fetch, summarize, mail)
//! - [`types`] - Lead/audit records, statuses, client scoping
//! - [`state`] - The status transition tables
//! - [`dedup`] - Canonical domains and the known-domain set
//! - [`ledger`] - The durable per-client stores
//! - [`contact`] - The contact resolution waterfall
//! - [`guard`] - The send-once guard
//! - [`pipeline`] - The four stages
//! - [`testing`] - Call-tracking mocks

pub mod classify;
pub mod compose;
pub mod contact;
pub mod dedup;
pub mod error;
pub mod fetchers;
pub mod guard;
pub mod ledger;
pub mod mailers;
pub mod pipeline;
pub mod providers;
pub mod security;
pub mod state;
pub mod summarizers;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{MailError, PipelineError, ProviderError, Result, StoreError};
pub use types::{
    audit::{AuditRecord, AuditStatus, SocialLinks},
    lead::{LeadRecord, LeadStatus},
    profile::{ClientProfile, ProfileBook},
    ClientKey,
};

// Re-export the core mechanisms
pub use contact::{extract_email, ContactContext, ContactTactic, ResolutionChain};
pub use dedup::{canonical_domain, DomainSet};
pub use guard::{GuardPolicy, SendGuard, SendVerdict};
pub use ledger::{CsvLedger, LedgerStore, MemoryLedger};
pub use state::{advance_audit, advance_lead, audit_can_transition, creation_status};

// Re-export the stages
pub use pipeline::{
    Analyst, AnalystConfig, AnalystReport, Closer, CloserConfig, CloserReport, Scout, ScoutConfig,
    ScoutReport, Sniper, SniperConfig, SniperReport, DIRECTORY_BLACKLIST,
};

// Re-export collaborator implementations
pub use classify::KeywordClassifier;
pub use compose::SenderIdentity;
pub use fetchers::HttpFetcher;
pub use mailers::HttpMailRelay;
pub use providers::{DuckDuckGoClient, HunterClient, SerpApiClient};
pub use summarizers::{GeminiClient, HeuristicSummarizer, PainPointEngine};
