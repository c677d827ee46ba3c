//! Pain-point summarization: model-backed when available, deterministic
//! heuristic always.

pub mod gemini;
pub mod heuristic;

use std::sync::Arc;

use tracing::debug;

use crate::traits::summarizer::Summarizer;
use crate::types::profile::ClientProfile;

pub use gemini::GeminiClient;
pub use heuristic::{heuristic_pain_point, HeuristicSummarizer};

/// Two implementations behind one call: the engine asks the model first and
/// falls back to the heuristic, so the caller always gets a sentence back
/// and never knows which implementation answered.
pub struct PainPointEngine {
    model: Option<Arc<dyn Summarizer>>,
}

impl PainPointEngine {
    /// Heuristic only - no model configured.
    pub fn heuristic_only() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: Arc<dyn Summarizer>) -> Self {
        Self { model: Some(model) }
    }

    pub async fn pain_point(&self, site_text: &str, profile: &ClientProfile) -> String {
        if let Some(model) = &self.model {
            if let Some(sentence) = model.summarize(site_text, profile).await {
                return sentence;
            }
            debug!(target: "analyst", "model summarization empty, using heuristics");
        }
        heuristic_pain_point(site_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSummarizer;

    #[tokio::test]
    async fn model_answer_wins_when_present() {
        let model = Arc::new(MockSummarizer::answering("Model sentence."));
        let engine = PainPointEngine::with_model(model);
        let out = engine.pain_point("site text", &ClientProfile::default()).await;
        assert_eq!(out, "Model sentence.");
    }

    #[tokio::test]
    async fn silent_model_falls_back_to_heuristic() {
        let model = Arc::new(MockSummarizer::silent());
        let engine = PainPointEngine::with_model(model);
        let out = engine.pain_point("site text", &ClientProfile::default()).await;
        assert_eq!(out, heuristic_pain_point("site text"));
    }

    #[tokio::test]
    async fn no_model_still_produces_a_sentence() {
        let engine = PainPointEngine::heuristic_only();
        let out = engine.pain_point("anything", &ClientProfile::default()).await;
        assert!(!out.is_empty());
    }
}
