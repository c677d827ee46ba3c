//! Search provider trait for lead discovery and snippet extraction.

use async_trait::async_trait;

use crate::error::ProviderResult;

/// One result from a search page - a URL plus whatever text the provider
/// attached to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// One page of search results in the two shapes providers return:
/// map-pack/local listings and organic results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub local: Vec<SearchHit>,
    pub organic: Vec<SearchHit>,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.organic.is_empty()
    }

    /// Both shapes normalized into one candidate list, local listings first
    /// - for a niche/location query those are the actual businesses.
    pub fn candidates(&self) -> impl Iterator<Item = &SearchHit> {
        self.local.iter().chain(self.organic.iter())
    }

    /// All attached text, for snippet-based email extraction.
    pub fn snippet_text(&self) -> String {
        let mut out = String::new();
        for hit in self.candidates() {
            if let Some(title) = &hit.title {
                out.push_str(title);
                out.push(' ');
            }
            if let Some(snippet) = &hit.snippet {
                out.push_str(snippet);
                out.push(' ');
            }
        }
        out
    }
}

/// A paginated web search provider.
///
/// `Err` is a provider-level failure (transport, quota, bad key) and is
/// explicitly distinguishable from `Ok` with an empty page: the discovery
/// chain escalates to its next tier on `Err` but stops paginating on an
/// empty page.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logs and reports.
    fn name(&self) -> &str;

    /// Fetch one page of results. `page` is zero-based.
    async fn search(&self, query: &str, page: u32) -> ProviderResult<SearchPage>;
}
