//! Outreach message composition with phrase rotation.
//!
//! Rotating greetings/openers keeps bulk sends from being byte-identical,
//! which matters for deliverability. Content quality is explicitly not the
//! point here - the pain-point sentence carries the message.

use crate::types::profile::ClientProfile;

/// Who the messages claim to be from.
#[derive(Debug, Clone)]
pub struct SenderIdentity {
    pub name: String,
    pub phone: Option<String>,
}

impl Default for SenderIdentity {
    fn default() -> Self {
        Self {
            name: "The Swarm Outreach Team".to_string(),
            phone: None,
        }
    }
}

const GREETINGS: &[&str] = &["Hi there,", "Hello,", "Hey,", "Greetings,"];

const OPENERS: &[&str] = &[
    "I was just taking a look at your site",
    "I came across your website",
    "I was reviewing your online presence",
    "My team was just looking at your site",
];

const TRANSITIONS: &[&str] = &[
    "and I noticed a quick win.",
    "and wanted to share an observation.",
    "and spotted a massive area for optimization.",
    "and wanted to drop a quick note.",
];

const SIGN_OFFS: &[&str] = &["Best,", "Cheers,", "Regards,", "Talk soon,"];

fn pick(choices: &'static [&'static str]) -> &'static str {
    choices[fastrand::usize(..choices.len())]
}

/// Bare host for display in subjects: scheme stripped, path dropped.
pub fn display_host(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or(url)
        .to_string()
}

pub fn outreach_subject(url: &str) -> String {
    format!("A specific idea for {}", display_host(url))
}

pub fn outreach_body(
    url: &str,
    pain_point: &str,
    profile: &ClientProfile,
    sender: &SenderIdentity,
) -> String {
    let greeting = pick(GREETINGS);
    let opener = pick(OPENERS);
    let transition = pick(TRANSITIONS);
    let sign_off = pick(SIGN_OFFS);

    let phone_line = sender
        .phone
        .as_deref()
        .map(|p| format!("Let's chat: {p}\n"))
        .unwrap_or_default();

    format!(
        "{greeting}\n\n{opener} at {url} {transition}\n\n{pain_point}\n\n\
         I've attached a custom strategic briefing showing exactly how {company} can plug \
         this leak.\n\n{phone_line}Trust link: {trust}\n\n{sign_off}\n{name}\n",
        company = profile.company_name,
        trust = profile.trust_link,
        name = sender.name,
    )
}

pub fn followup_subject(url: &str) -> String {
    format!("Re: Question about {}'s lead flow", display_host(url))
}

pub fn followup_body(url: &str, sender: &SenderIdentity) -> String {
    let host = display_host(url);
    format!(
        "Hi again,\n\nI know things get buried in the inbox, so I just wanted to float this \
         to the top.\n\nDid you get a chance to look at the audit I sent over for {host}?\n\n\
         I'm confident that fixing the leak we identified will have an immediate impact on \
         your conversion rates.\n\nLet me know if you'd like me to resend it.\n\nBest,\n{name}\n",
        name = sender.name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_host_strips_scheme_and_path() {
        assert_eq!(display_host("https://www.newroof.com/about"), "www.newroof.com");
        assert_eq!(display_host("http://newroof.com"), "newroof.com");
        assert_eq!(display_host("newroof.com/x"), "newroof.com");
    }

    #[test]
    fn subject_names_the_host() {
        assert_eq!(outreach_subject("https://newroof.com/"), "A specific idea for newroof.com");
    }

    #[test]
    fn body_carries_pain_point_and_profile() {
        let profile = ClientProfile {
            company_name: "Acme Automation".into(),
            trust_link: "https://acme.example/wins".into(),
            ..Default::default()
        };
        let sender = SenderIdentity {
            name: "Jordan".into(),
            phone: Some("(720) 555-0100".into()),
        };
        let body = outreach_body("https://newroof.com", "You leak $20k.", &profile, &sender);
        assert!(body.contains("You leak $20k."));
        assert!(body.contains("Acme Automation"));
        assert!(body.contains("https://acme.example/wins"));
        assert!(body.contains("(720) 555-0100"));
        assert!(body.contains("Jordan"));
    }

    #[test]
    fn followup_mentions_the_host() {
        let sender = SenderIdentity::default();
        assert!(followup_subject("https://newroof.com").contains("newroof.com"));
        assert!(followup_body("https://newroof.com", &sender).contains("newroof.com"));
    }
}
