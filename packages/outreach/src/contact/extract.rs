//! Email token extraction from scraped text.

use std::sync::OnceLock;

use regex::Regex;

/// Terms that mark an address as a placeholder, builder artifact, or
/// tracking endpoint rather than a real inbox.
const JUNK_TERMS: &[&str] = &[
    "sentry", "no-reply", "noreply", "example", "domain", "email", "username", "user", "test",
];

/// Asset filenames that the email pattern happens to match (`logo@2x.png`
/// and friends).
const JUNK_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".css", ".js", ".svg", ".woff", ".woff2", ".ttf", ".webp",
];

/// Local parts that usually reach a human inbox, in preference order.
const PRIORITY_LOCALS: &[&str] = &[
    "info", "contact", "sales", "hello", "office", "admin", "support", "estimate",
];

const MIN_LEN: usize = 6;
const MAX_LEN: usize = 64;

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("static pattern")
    })
}

/// Extract the single best contact email from a blob of page text.
///
/// Candidates survive the junk-term and file-extension blocklists and a
/// sane length range; among survivors, a priority local part wins over
/// scan order.
pub fn extract_email(text: &str) -> Option<String> {
    let mut candidates: Vec<String> = Vec::new();
    for token in email_pattern().find_iter(text) {
        let token = token.as_str();
        let lower = token.to_lowercase();
        if lower.len() < MIN_LEN || lower.len() > MAX_LEN {
            continue;
        }
        if JUNK_TERMS.iter().any(|term| lower.contains(term)) {
            continue;
        }
        if JUNK_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            continue;
        }
        if !candidates.iter().any(|c| c.eq_ignore_ascii_case(token)) {
            candidates.push(token.to_string());
        }
    }

    for local in PRIORITY_LOCALS {
        if let Some(hit) = candidates
            .iter()
            .find(|c| c.split('@').next().is_some_and(|l| l.eq_ignore_ascii_case(local)))
        {
            return Some(hit.clone());
        }
    }
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_local_beats_scan_order() {
        let text = "Reach random.person@biz.com or info@biz.com for quotes";
        assert_eq!(extract_email(text), Some("info@biz.com".to_string()));
    }

    #[test]
    fn first_valid_wins_without_priority_match() {
        let text = "jane.doe@biz.com then bob@other.com";
        assert_eq!(extract_email(text), Some("jane.doe@biz.com".to_string()));
    }

    #[test]
    fn junk_terms_are_discarded() {
        let text = "noreply@biz.com no-reply@biz.com errors@sentry.biz.com you@example.com";
        assert_eq!(extract_email(text), None);
    }

    #[test]
    fn asset_filenames_are_discarded() {
        let text = "background: url(hero@2x.png); see logo@large.webp";
        assert_eq!(extract_email(text), None);
    }

    #[test]
    fn junk_before_a_valid_hit_does_not_block_it() {
        let text = "noreply@biz.com ... sales@biz.com";
        assert_eq!(extract_email(text), Some("sales@biz.com".to_string()));
    }

    #[test]
    fn no_match_in_plain_prose() {
        assert_eq!(extract_email("Call us at (720) 555-0100 today"), None);
    }

    #[test]
    fn overlong_tokens_are_discarded() {
        let long = format!("{}@biz.com", "a".repeat(80));
        assert_eq!(extract_email(&long), None);
    }
}
