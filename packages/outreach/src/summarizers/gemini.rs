//! Gemini-backed summarizer and reply classifier.
//!
//! Best-effort on every path: transport trouble, a non-success status, or
//! an empty completion all degrade to `None` / the default intent.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::security::SecretString;
use crate::traits::classifier::{ReplyClassifier, ReplyIntent};
use crate::traits::summarizer::Summarizer;
use crate::types::profile::ClientProfile;

const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

pub struct GeminiClient {
    api_key: SecretString,
    client: reqwest::Client,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// One-shot text completion. `None` on any failure.
    async fn generate(&self, prompt: &str) -> Option<String> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: Option<Content>,
        }
        #[derive(Deserialize)]
        struct Content {
            #[serde(default)]
            parts: Vec<Part>,
        }
        #[derive(Deserialize)]
        struct Part {
            text: Option<String>,
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = match self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose())])
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(target: "analyst", %err, "model request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(target: "analyst", status = %response.status(), "model rejected request");
            return None;
        }

        let parsed: Response = match response.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(target: "analyst", %err, "model response unreadable");
                return None;
            }
        };

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, site_text: &str, profile: &ClientProfile) -> Option<String> {
        let prompt = format!(
            "You are an automation consultant for a {industry} agency analyzing a local \
             business's website from the text below. Identify the single most significant \
             revenue leak - a clear inefficiency where the business loses money for lack of \
             automation, with special attention to {focus}. Estimate a realistic annual cost \
             for that leak, then compress the finding and the figure into one hard-hitting \
             sentence suitable for a cold email, shaped like: '<identified weakness>, \
             potentially losing you an estimated <annual figure> annually.' Output only that \
             single sentence.\n\nWebsite text:\n{site_text}",
            industry = profile.industry,
            focus = profile.pain_point_focus,
        );
        debug!(target: "analyst", "requesting model pain-point summary");
        // Only the first line counts; models sometimes append commentary.
        self.generate(&prompt)
            .await
            .and_then(|text| text.lines().next().map(|l| l.trim().to_string()))
            .filter(|line| !line.is_empty())
    }
}

#[async_trait]
impl ReplyClassifier for GeminiClient {
    async fn classify(&self, body: &str) -> ReplyIntent {
        let prompt = format!(
            "Classify the intent of this reply to a cold outreach email. Answer with exactly \
             one of: HOT LEAD, NOT INTERESTED, DEAD, REPLIED.\n\nReply:\n{body}"
        );
        let Some(answer) = self.generate(&prompt).await else {
            return ReplyIntent::Replied;
        };
        let upper = answer.to_uppercase();
        // Order matters: "NOT INTERESTED" contains no "HOT LEAD", but keep
        // the negative checks ahead of the loose ones anyway.
        if upper.contains("NOT INTERESTED") {
            ReplyIntent::NotInterested
        } else if upper.contains("DEAD") {
            ReplyIntent::Dead
        } else if upper.contains("HOT LEAD") {
            ReplyIntent::HotLead
        } else {
            ReplyIntent::Replied
        }
    }
}
