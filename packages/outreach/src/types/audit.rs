//! Audit records - analyzed leads carrying the pain point and outreach state.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ParseStatusError;

/// Status of an audit record, from creation through outreach resolution.
///
/// Wire strings are the exact values persisted in the audit store. The legal
/// transitions between variants live in [`crate::state`]; this type is just
/// the closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditStatus {
    /// Contact email resolved; ready for outreach
    Analyzed,
    /// No email, no social link, no contact page
    DeadEnd,
    /// No email, but a social profile was found - manual DM territory
    RequiresDm,
    /// No email, but the site has a contact form
    UseForm,
    /// Outreach-time enrichment exhausted with no address
    DeadEndNoEmail,
    /// Outreach email dispatched
    Sent,
    /// Dispatch failed; retried by a future run
    SendFailed,
    /// Recipient already contacted - skip recorded for auditability
    SkippedPreviouslySent,
    /// Unexpected per-record failure; batch continued
    Error,
    /// Reply received, intent unclear
    Replied,
    /// Reply received, positive intent
    HotLead,
    /// Reply received, declined
    NotInterested,
    /// Reply received, address dead or bounced
    Dead,
    /// No reply after the follow-up window; follow-up dispatched
    FollowedUp,
}

impl AuditStatus {
    /// Wire string as persisted in the audit store.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Analyzed => "Analyzed",
            AuditStatus::DeadEnd => "Dead End",
            AuditStatus::RequiresDm => "Requires DM",
            AuditStatus::UseForm => "Use Form",
            AuditStatus::DeadEndNoEmail => "Dead End - No Email",
            AuditStatus::Sent => "Sent",
            AuditStatus::SendFailed => "Send Failed",
            AuditStatus::SkippedPreviouslySent => "Skipped - Previously Sent",
            AuditStatus::Error => "Error",
            AuditStatus::Replied => "Replied",
            AuditStatus::HotLead => "Hot Lead",
            AuditStatus::NotInterested => "Not Interested",
            AuditStatus::Dead => "Dead",
            AuditStatus::FollowedUp => "Followed Up",
        }
    }

    /// True once an outreach email has gone out to this record's address.
    ///
    /// These are the statuses the send guard treats as "already contacted"
    /// when it rebuilds history - every one of them implies a dispatch.
    pub fn is_post_send(&self) -> bool {
        matches!(
            self,
            AuditStatus::Sent
                | AuditStatus::FollowedUp
                | AuditStatus::Replied
                | AuditStatus::HotLead
                | AuditStatus::NotInterested
                | AuditStatus::Dead
        )
    }

    /// True when the outreach stage should pick this record up.
    ///
    /// `SendFailed` is retryable by design.
    pub fn is_pending_send(&self) -> bool {
        matches!(self, AuditStatus::Analyzed | AuditStatus::SendFailed)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analyzed" => Ok(AuditStatus::Analyzed),
            "dead end" => Ok(AuditStatus::DeadEnd),
            "requires dm" => Ok(AuditStatus::RequiresDm),
            "use form" => Ok(AuditStatus::UseForm),
            "dead end - no email" => Ok(AuditStatus::DeadEndNoEmail),
            "sent" => Ok(AuditStatus::Sent),
            "send failed" => Ok(AuditStatus::SendFailed),
            "skipped - previously sent" => Ok(AuditStatus::SkippedPreviouslySent),
            "error" => Ok(AuditStatus::Error),
            "replied" => Ok(AuditStatus::Replied),
            "hot lead" => Ok(AuditStatus::HotLead),
            "not interested" => Ok(AuditStatus::NotInterested),
            "dead" => Ok(AuditStatus::Dead),
            "followed up" => Ok(AuditStatus::FollowedUp),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl Serialize for AuditStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AuditStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Social and contact links harvested while scraping a site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub contact_page: Option<String>,
}

impl SocialLinks {
    /// Any DM-able profile present.
    pub fn has_social(&self) -> bool {
        self.facebook.is_some()
            || self.linkedin.is_some()
            || self.instagram.is_some()
            || self.twitter.is_some()
    }
}

/// One analyzed lead: pain-point summary plus contact/outreach progress.
///
/// Created by the analysis stage, mutated by the outreach stages, never
/// deleted - dead ends are status values, not row removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Pain_Point_Summary")]
    pub pain_point_summary: String,

    #[serde(rename = "Status")]
    pub status: AuditStatus,

    #[serde(rename = "Email")]
    pub email: Option<String>,

    #[serde(rename = "Facebook")]
    pub facebook: Option<String>,

    #[serde(rename = "LinkedIn")]
    pub linkedin: Option<String>,

    #[serde(rename = "Instagram")]
    pub instagram: Option<String>,

    #[serde(rename = "Twitter")]
    pub twitter: Option<String>,

    #[serde(rename = "Contact Page")]
    pub contact_page: Option<String>,

    #[serde(rename = "Sent Date")]
    pub sent_date: Option<NaiveDate>,

    #[serde(rename = "Audit Attached", default)]
    pub audit_attached: bool,
}

impl AuditRecord {
    /// Column order of the audit store.
    pub const HEADERS: &'static [&'static str] = &[
        "URL",
        "Pain_Point_Summary",
        "Status",
        "Email",
        "Facebook",
        "LinkedIn",
        "Instagram",
        "Twitter",
        "Contact Page",
        "Sent Date",
        "Audit Attached",
    ];

    /// Build a record from analysis output. The status is assigned by the
    /// creation-priority rule in [`crate::state::creation_status`].
    pub fn from_analysis(
        url: impl Into<String>,
        pain_point_summary: impl Into<String>,
        email: Option<String>,
        socials: SocialLinks,
    ) -> Self {
        let status = crate::state::creation_status(email.as_deref(), &socials);
        Self {
            url: url.into(),
            pain_point_summary: pain_point_summary.into(),
            status,
            email,
            facebook: socials.facebook,
            linkedin: socials.linkedin,
            instagram: socials.instagram,
            twitter: socials.twitter,
            contact_page: socials.contact_page,
            sent_date: None,
            audit_attached: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_wire_string() {
        let all = [
            AuditStatus::Analyzed,
            AuditStatus::DeadEnd,
            AuditStatus::RequiresDm,
            AuditStatus::UseForm,
            AuditStatus::DeadEndNoEmail,
            AuditStatus::Sent,
            AuditStatus::SendFailed,
            AuditStatus::SkippedPreviouslySent,
            AuditStatus::Error,
            AuditStatus::Replied,
            AuditStatus::HotLead,
            AuditStatus::NotInterested,
            AuditStatus::Dead,
            AuditStatus::FollowedUp,
        ];
        for status in all {
            assert_eq!(status.as_str().parse::<AuditStatus>().unwrap(), status);
        }
    }

    #[test]
    fn post_send_covers_every_dispatched_state() {
        assert!(AuditStatus::Sent.is_post_send());
        assert!(AuditStatus::FollowedUp.is_post_send());
        assert!(AuditStatus::Replied.is_post_send());
        assert!(!AuditStatus::Analyzed.is_post_send());
        assert!(!AuditStatus::SkippedPreviouslySent.is_post_send());
    }

    #[test]
    fn from_analysis_applies_priority_rule() {
        let with_email = AuditRecord::from_analysis(
            "https://a.com",
            "summary",
            Some("info@a.com".into()),
            SocialLinks::default(),
        );
        assert_eq!(with_email.status, AuditStatus::Analyzed);

        let socials = SocialLinks {
            facebook: Some("https://facebook.com/a".into()),
            ..Default::default()
        };
        let with_social = AuditRecord::from_analysis("https://a.com", "summary", None, socials);
        assert_eq!(with_social.status, AuditStatus::RequiresDm);
    }
}
