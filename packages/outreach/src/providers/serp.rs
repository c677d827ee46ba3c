//! SerpAPI-backed search provider - the paid primary tier.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};
use crate::security::SecretString;
use crate::traits::searcher::{SearchHit, SearchPage, SearchProvider};

/// Results per page the engine is asked for. Pagination advances the
/// `start` offset in steps of 10 regardless, matching the engine's indexing.
const RESULTS_PER_PAGE: usize = 20;

/// SerpAPI client. Surfaces both result shapes: the local/map pack and
/// organic listings.
pub struct SerpApiClient {
    api_key: SecretString,
    client: reqwest::Client,
    engine: String,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            engine: "google".to_string(),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }
}

#[derive(Deserialize)]
struct SerpResponse {
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    local_results: Option<LocalResults>,
}

#[derive(Deserialize)]
struct OrganicResult {
    link: Option<String>,
    title: Option<String>,
    snippet: Option<String>,
}

/// The map pack arrives either wrapped in a `places` object or as a bare
/// array, depending on the engine.
#[derive(Deserialize)]
#[serde(untagged)]
enum LocalResults {
    Wrapped {
        #[serde(default)]
        places: Vec<LocalPlace>,
    },
    Flat(Vec<LocalPlace>),
}

#[derive(Deserialize)]
struct LocalPlace {
    title: Option<String>,
    website: Option<String>,
}

impl LocalResults {
    fn into_places(self) -> Vec<LocalPlace> {
        match self {
            LocalResults::Wrapped { places } => places,
            LocalResults::Flat(places) => places,
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    fn name(&self) -> &str {
        "serpapi"
    }

    async fn search(&self, query: &str, page: u32) -> ProviderResult<SearchPage> {
        let start = (page * 10).to_string();
        let num = RESULTS_PER_PAGE.to_string();
        let response = self
            .client
            .get("https://serpapi.com/search")
            .query(&[
                ("engine", self.engine.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("start", start.as_str()),
                ("api_key", self.api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                message: format!("serpapi returned {}", response.status()),
            });
        }

        let body: SerpResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(message) = body.error {
            return Err(ProviderError::Api { message });
        }

        let mut result = SearchPage::default();
        if let Some(local) = body.local_results {
            for place in local.into_places() {
                let Some(website) = place.website else {
                    continue;
                };
                let mut hit = SearchHit::new(website);
                if let Some(title) = place.title {
                    hit = hit.with_title(title);
                }
                result.local.push(hit);
            }
        }
        for organic in body.organic_results {
            let Some(link) = organic.link else {
                continue;
            };
            let mut hit = SearchHit::new(link);
            if let Some(title) = organic.title {
                hit = hit.with_title(title);
            }
            if let Some(snippet) = organic.snippet {
                hit = hit.with_snippet(snippet);
            }
            result.organic.push(hit);
        }
        Ok(result)
    }
}
