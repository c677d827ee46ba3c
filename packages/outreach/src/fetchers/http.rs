//! HTTP page fetcher: visible text plus social/contact link harvest.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::traits::fetcher::{FetchOptions, FetchOutcome, PageFetcher};
use crate::types::audit::SocialLinks;

/// Rotated per request to look like ordinary browser traffic.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/115.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36",
];

const RETRY_DELAY: Duration = Duration::from_secs(2);

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn try_fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let agent = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(reqwest::header::USER_AGENT, agent)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, opts: FetchOptions) -> FetchOutcome {
        debug!(target: "fetch", url, "fetching site text");
        for attempt in 0..=opts.retries {
            match self.try_fetch(url, opts.timeout).await {
                Ok(html) => return parse_page(url, &html, opts.max_chars),
                Err(err) => {
                    if attempt < opts.retries {
                        warn!(target: "fetch", url, attempt = attempt + 1, %err, "fetch failed, retrying");
                        tokio::time::sleep(RETRY_DELAY).await;
                    } else {
                        warn!(target: "fetch", url, attempts = opts.retries + 1, %err, "fetch failed, giving up");
                    }
                }
            }
        }
        FetchOutcome::default()
    }
}

/// Extract visible text, `mailto:` addresses, and social/contact links.
fn parse_page(base_url: &str, html: &str, max_chars: usize) -> FetchOutcome {
    let doc = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").expect("static selector");
    let base = Url::parse(base_url).ok();

    let mut socials = SocialLinks::default();
    let mut mailtos: Vec<String> = Vec::new();

    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let lower = href.to_lowercase();

        if let Some(address) = lower.strip_prefix("mailto:") {
            // Keep only the address part; subjects etc. follow a '?'.
            let address = address.split('?').next().unwrap_or(address);
            if !address.is_empty() {
                mailtos.push(address.to_string());
            }
            continue;
        }

        if lower.contains("facebook.com") && !lower.contains("sharer") {
            socials.facebook.get_or_insert_with(|| href.to_string());
        } else if lower.contains("linkedin.com") && !lower.contains("share") {
            socials.linkedin.get_or_insert_with(|| href.to_string());
        } else if lower.contains("instagram.com") {
            socials.instagram.get_or_insert_with(|| href.to_string());
        } else if lower.contains("twitter.com") || lower.contains("//x.com") {
            socials.twitter.get_or_insert_with(|| href.to_string());
        }

        if lower.contains("contact") && socials.contact_page.is_none() {
            let resolved = base
                .as_ref()
                .and_then(|b| b.join(href).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| href.to_string());
            socials.contact_page = Some(resolved);
        }
    }

    let mut text = doc
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        warn!(target: "fetch", url = base_url, "no text content found");
        return FetchOutcome {
            text: None,
            socials,
        };
    }

    if !mailtos.is_empty() {
        text.push(' ');
        text.push_str(&mailtos.join(" "));
    }

    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }

    FetchOutcome {
        text: Some(text),
        socials,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
          <h1>New Roof Co</h1>
          <p>Denver's roofing experts.</p>
          <a href="mailto:info@newroof.com?subject=Quote">Email us</a>
          <a href="https://www.facebook.com/newroof">Facebook</a>
          <a href="https://www.facebook.com/sharer/sharer.php?u=x">Share</a>
          <a href="/contact-us">Get in touch</a>
          <a href="https://twitter.com/newroof">Tweets</a>
        </body></html>
    "#;

    #[test]
    fn harvests_mailto_into_text() {
        let outcome = parse_page("https://newroof.com", SAMPLE, 4_000);
        let text = outcome.text.unwrap();
        assert!(text.contains("Denver's roofing experts."));
        assert!(text.contains("info@newroof.com"));
        assert!(!text.contains("subject=Quote"));
    }

    #[test]
    fn harvests_social_and_contact_links() {
        let outcome = parse_page("https://newroof.com", SAMPLE, 4_000);
        assert_eq!(outcome.socials.facebook.as_deref(), Some("https://www.facebook.com/newroof"));
        assert_eq!(outcome.socials.twitter.as_deref(), Some("https://twitter.com/newroof"));
        assert_eq!(outcome.socials.contact_page.as_deref(), Some("https://newroof.com/contact-us"));
        assert!(outcome.socials.linkedin.is_none());
    }

    #[test]
    fn share_widgets_are_not_profiles() {
        let html = r#"<a href="https://www.facebook.com/sharer/sharer.php?u=x">Share</a>"#;
        let outcome = parse_page("https://a.com", html, 4_000);
        assert!(outcome.socials.facebook.is_none());
    }

    #[test]
    fn empty_page_yields_no_text_but_keeps_links() {
        let html = r#"<html><body><a href="/contact"> </a></body></html>"#;
        let outcome = parse_page("https://a.com", html, 4_000);
        assert!(outcome.text.is_none());
        assert_eq!(outcome.socials.contact_page.as_deref(), Some("https://a.com/contact"));
    }

    #[test]
    fn text_is_capped_at_max_chars() {
        let html = format!("<p>{}</p>", "word ".repeat(2_000));
        let outcome = parse_page("https://a.com", &html, 100);
        assert!(outcome.text.unwrap().chars().count() <= 100);
    }
}
