//! Deterministic pain-point heuristics.

use async_trait::async_trait;

use crate::traits::summarizer::Summarizer;
use crate::types::profile::ClientProfile;

/// Rule-based single-sentence pain point. Always answers.
pub fn heuristic_pain_point(site_text: &str) -> String {
    let s = site_text.to_lowercase();
    if !s.contains("contact") {
        return "Your website has no visible lead-capture form on the homepage, potentially \
                losing you an estimated $15,000 annually from missed conversion opportunities."
            .to_string();
    }
    if s.contains("book") && !s.contains("online") && !s.contains("book now") {
        return "Your site appears to use a manual booking process, potentially losing you an \
                estimated $25,000 annually from customers who expect instant online scheduling."
            .to_string();
    }
    if s.contains("support") && !s.contains("chat") && s.contains("help") {
        return "Your support page lacks an instant AI chat, potentially losing you an estimated \
                $20,000 annually from unresolved customer questions."
            .to_string();
    }
    "Your website lacks a clear, instant lead-capture mechanism, potentially losing you an \
     estimated $18,000 annually from missed opportunities."
        .to_string()
}

/// The heuristic behind the [`Summarizer`] seam - never returns `None`.
pub struct HeuristicSummarizer;

#[async_trait]
impl Summarizer for HeuristicSummarizer {
    async fn summarize(&self, site_text: &str, _profile: &ClientProfile) -> Option<String> {
        Some(heuristic_pain_point(site_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_contact_form_rule_fires_first() {
        let out = heuristic_pain_point("We fix roofs. Call today.");
        assert!(out.contains("lead-capture form"));
    }

    #[test]
    fn manual_booking_rule() {
        let out = heuristic_pain_point("contact us to book an appointment by phone");
        assert!(out.contains("manual booking"));
    }

    #[test]
    fn default_rule_always_answers() {
        let out = heuristic_pain_point("contact page with online booking chat");
        assert!(out.contains("$18,000"));
    }
}
