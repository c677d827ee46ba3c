//! Mock collaborators for testing.
//!
//! Deterministic, configurable stand-ins for every external seam, with call
//! tracking so tests can assert which tiers actually ran.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{MailError, ProviderError, ProviderResult};
use crate::traits::classifier::{ReplyClassifier, ReplyIntent};
use crate::traits::enricher::EmailEnricher;
use crate::traits::fetcher::{FetchOptions, FetchOutcome, PageFetcher};
use crate::traits::mail::{MailTransport, MailboxReader, OutboundMail};
use crate::traits::searcher::{SearchHit, SearchPage, SearchProvider};
use crate::traits::summarizer::Summarizer;
use crate::types::audit::SocialLinks;
use crate::types::profile::ClientProfile;

/// Scripted search provider: responses are consumed in call order, and an
/// exhausted script answers with an empty page.
pub struct MockSearchProvider {
    name: String,
    script: RwLock<VecDeque<ScriptedSearch>>,
    calls: RwLock<Vec<(String, u32)>>,
}

enum ScriptedSearch {
    Page(SearchPage),
    Error(String),
}

impl MockSearchProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: RwLock::new(VecDeque::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Queue a full result page.
    pub fn with_page(self, page: SearchPage) -> Self {
        self.script.write().unwrap().push_back(ScriptedSearch::Page(page));
        self
    }

    /// Queue a page of organic hits built from bare URLs.
    pub fn with_organic_urls(self, urls: &[&str]) -> Self {
        let page = SearchPage {
            local: Vec::new(),
            organic: urls.iter().map(|u| SearchHit::new(*u)).collect(),
        };
        self.with_page(page)
    }

    /// Queue a provider-level error.
    pub fn with_error(self) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(ScriptedSearch::Error("scripted provider error".to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, page: u32) -> ProviderResult<SearchPage> {
        self.calls.write().unwrap().push((query.to_string(), page));
        match self.script.write().unwrap().pop_front() {
            Some(ScriptedSearch::Page(page)) => Ok(page),
            Some(ScriptedSearch::Error(message)) => Err(ProviderError::Api { message }),
            None => Ok(SearchPage::default()),
        }
    }
}

/// Canned page fetcher keyed by URL; unknown URLs fetch as failures.
#[derive(Default)]
pub struct MockFetcher {
    pages: RwLock<HashMap<String, FetchOutcome>>,
    calls: RwLock<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve plain text (no links) for a URL.
    pub fn with_text(self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_outcome(
            url,
            FetchOutcome {
                text: Some(text.into()),
                socials: SocialLinks::default(),
            },
        )
    }

    pub fn with_outcome(self, url: impl Into<String>, outcome: FetchOutcome) -> Self {
        self.pages.write().unwrap().insert(url.into(), outcome);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, _opts: FetchOptions) -> FetchOutcome {
        self.calls.write().unwrap().push(url.to_string());
        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_default()
    }
}

/// Summarizer with one canned answer (or none, to exercise fallbacks).
pub struct MockSummarizer {
    response: Option<String>,
    calls: RwLock<usize>,
}

impl MockSummarizer {
    pub fn answering(sentence: impl Into<String>) -> Self {
        Self {
            response: Some(sentence.into()),
            calls: RwLock::new(0),
        }
    }

    pub fn silent() -> Self {
        Self {
            response: None,
            calls: RwLock::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.read().unwrap()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _site_text: &str, _profile: &ClientProfile) -> Option<String> {
        *self.calls.write().unwrap() += 1;
        self.response.clone()
    }
}

/// Enricher with canned domain → address answers.
#[derive(Default)]
pub struct MockEnricher {
    addresses: RwLock<HashMap<String, String>>,
    calls: RwLock<Vec<String>>,
}

impl MockEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(self, domain: impl Into<String>, email: impl Into<String>) -> Self {
        self.addresses
            .write()
            .unwrap()
            .insert(domain.into(), email.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl EmailEnricher for MockEnricher {
    async fn enrich(&self, domain: &str) -> Option<String> {
        self.calls.write().unwrap().push(domain.to_string());
        self.addresses.read().unwrap().get(domain).cloned()
    }
}

/// Mail transport that records every dispatch. Default: everything is
/// accepted; individual recipients can be scripted to refuse or error.
#[derive(Default)]
pub struct MockTransport {
    refuse: RwLock<HashSet<String>>,
    error: RwLock<HashSet<String>>,
    sent: RwLock<Vec<OutboundMail>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay refuses this recipient (`Ok(false)` - retryable).
    pub fn refusing(self, to: impl Into<String>) -> Self {
        self.refuse.write().unwrap().insert(to.into());
        self
    }

    /// Transport errors for this recipient (`Err` - per-record boundary).
    pub fn erroring(self, to: impl Into<String>) -> Self {
        self.error.write().unwrap().insert(to.into());
        self
    }

    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.read().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    pub fn sent_to(&self) -> Vec<String> {
        self.sent.read().unwrap().iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<bool, MailError> {
        if self.error.read().unwrap().contains(&mail.to) {
            return Err(MailError::Api {
                message: "scripted transport error".to_string(),
            });
        }
        if self.refuse.read().unwrap().contains(&mail.to) {
            return Ok(false);
        }
        self.sent.write().unwrap().push(mail.clone());
        Ok(true)
    }
}

/// Mailbox with canned replies; addresses can be scripted to fail checks.
#[derive(Default)]
pub struct MockMailbox {
    replies: RwLock<HashMap<String, String>>,
    check_errors: RwLock<HashSet<String>>,
    probe_fails: RwLock<bool>,
}

impl MockMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, from: impl Into<String>, body: impl Into<String>) -> Self {
        self.replies.write().unwrap().insert(from.into(), body.into());
        self
    }

    /// `has_reply_from` errors for this address.
    pub fn failing_check_for(self, from: impl Into<String>) -> Self {
        self.check_errors.write().unwrap().insert(from.into());
        self
    }

    /// The stage-start probe fails.
    pub fn unreachable(self) -> Self {
        *self.probe_fails.write().unwrap() = true;
        self
    }
}

#[async_trait]
impl MailboxReader for MockMailbox {
    async fn probe(&self) -> Result<(), MailError> {
        if *self.probe_fails.read().unwrap() {
            return Err(MailError::Api {
                message: "scripted probe failure".to_string(),
            });
        }
        Ok(())
    }

    async fn has_reply_from(&self, address: &str) -> Result<bool, MailError> {
        if self.check_errors.read().unwrap().contains(address) {
            return Err(MailError::Api {
                message: "scripted check failure".to_string(),
            });
        }
        Ok(self.replies.read().unwrap().contains_key(address))
    }

    async fn latest_body_from(&self, address: &str) -> Option<String> {
        self.replies.read().unwrap().get(address).cloned()
    }
}

/// Classifier that always answers the same intent.
pub struct MockClassifier {
    intent: ReplyIntent,
}

impl MockClassifier {
    pub fn always(intent: ReplyIntent) -> Self {
        Self { intent }
    }
}

#[async_trait]
impl ReplyClassifier for MockClassifier {
    async fn classify(&self, _body: &str) -> ReplyIntent {
        self.intent
    }
}
