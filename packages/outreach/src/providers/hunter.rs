//! Hunter.io domain-search client - the enrichment tier.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::security::SecretString;
use crate::traits::enricher::EmailEnricher;

pub struct HunterClient {
    api_key: SecretString,
    client: reqwest::Client,
}

impl HunterClient {
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct HunterResponse {
    #[serde(default)]
    data: HunterData,
}

#[derive(Deserialize, Default)]
struct HunterData {
    #[serde(default)]
    emails: Vec<HunterEmail>,
}

#[derive(Deserialize)]
struct HunterEmail {
    value: Option<String>,
}

#[async_trait]
impl EmailEnricher for HunterClient {
    async fn enrich(&self, domain: &str) -> Option<String> {
        info!(target: "enrich", domain, "querying domain-search enrichment");
        let response = match self
            .client
            .get("https://api.hunter.io/v2/domain-search")
            .query(&[("domain", domain), ("api_key", self.api_key.expose())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(target: "enrich", domain, %err, "enrichment request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(target: "enrich", domain, status = %response.status(), "enrichment rejected");
            return None;
        }

        let body: HunterResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                warn!(target: "enrich", domain, %err, "enrichment response unreadable");
                return None;
            }
        };

        let found = body
            .data
            .emails
            .into_iter()
            .filter_map(|e| e.value)
            .find(|v| !v.trim().is_empty());
        match &found {
            Some(email) => info!(target: "enrich", domain, email, "enrichment found address"),
            None => warn!(target: "enrich", domain, "enrichment found no address"),
        }
        found
    }
}
