//! DuckDuckGo HTML endpoint - the zero-cost fallback tier.
//!
//! No API key, no quota: scrapes the plain-HTML results page. Results only
//! come in the organic shape.

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::{ProviderError, ProviderResult};
use crate::traits::searcher::{SearchHit, SearchPage, SearchProvider};

/// The HTML endpoint paginates in steps of roughly 30 results.
const PAGE_STEP: u32 = 30;

pub struct DuckDuckGoClient {
    client: reqwest::Client,
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

/// Result links are redirect wrappers (`//duckduckgo.com/l/?uddg=<target>`);
/// unwrap to the target URL when present.
fn unwrap_redirect(href: &str) -> Option<String> {
    if !href.contains("uddg=") {
        return Some(href.to_string());
    }
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = url::Url::parse(&absolute).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
}

fn parse_results(html: &str) -> Vec<SearchHit> {
    let doc = Html::parse_document(html);
    let result_sel = Selector::parse("div.result").expect("static selector");
    let link_sel = Selector::parse("a.result__a").expect("static selector");
    let snippet_sel = Selector::parse(".result__snippet").expect("static selector");

    let mut hits = Vec::new();
    for block in doc.select(&result_sel) {
        let Some(anchor) = block.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = unwrap_redirect(href) else {
            continue;
        };
        let title: String = anchor.text().collect::<Vec<_>>().join(" ");
        let mut hit = SearchHit::new(url);
        if !title.trim().is_empty() {
            hit = hit.with_title(title.trim().to_string());
        }
        if let Some(snippet) = block.select(&snippet_sel).next() {
            let text: String = snippet.text().collect::<Vec<_>>().join(" ");
            if !text.trim().is_empty() {
                hit = hit.with_snippet(text.trim().to_string());
            }
        }
        hits.push(hit);
    }
    hits
}

#[async_trait]
impl SearchProvider for DuckDuckGoClient {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, page: u32) -> ProviderResult<SearchPage> {
        let offset = (page * PAGE_STEP).to_string();
        let response = self
            .client
            .get("https://html.duckduckgo.com/html/")
            .query(&[("q", query), ("s", offset.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                message: format!("duckduckgo returned {}", response.status()),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        Ok(SearchPage {
            local: Vec::new(),
            organic: parse_results(&html),
        })
    }
}
