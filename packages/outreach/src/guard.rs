//! The send guard: at-most-once outreach per recipient.
//!
//! Rebuilt from audit history at the start of each outreach run, then
//! updated in place as sends go out - the same-session set and the
//! historical set together enforce the send-once invariant.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::types::audit::AuditRecord;

/// How far back "already contacted" reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Any address ever contacted is blocked for good.
    Forever,
    /// Block only addresses contacted within the last `days` days. An
    /// address with post-send history but no recorded date is blocked -
    /// unknown recency is treated as recent.
    Cooldown { days: i64 },
}

/// The guard's verdict for one candidate recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendVerdict {
    Fresh,
    DuplicateThisSession,
    AlreadyContacted,
    WithinCooldown { days_ago: i64 },
}

impl SendVerdict {
    pub fn permits_send(&self) -> bool {
        matches!(self, SendVerdict::Fresh)
    }
}

/// Normalized form used as the dedup key for addresses.
pub fn normalize_email(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Session- and history-scoped duplicate-send protection.
pub struct SendGuard {
    policy: GuardPolicy,
    history: HashSet<String>,
    last_contact: HashMap<String, NaiveDate>,
    session: HashSet<String>,
}

impl SendGuard {
    /// Build from the client's full audit history. Every record with a
    /// post-send status contributes its address.
    pub fn from_history(audits: &[AuditRecord], policy: GuardPolicy) -> Self {
        let mut history = HashSet::new();
        let mut last_contact: HashMap<String, NaiveDate> = HashMap::new();
        for record in audits {
            if !record.status.is_post_send() {
                continue;
            }
            let Some(email) = record.email.as_deref() else {
                continue;
            };
            let key = normalize_email(email);
            if key.is_empty() {
                continue;
            }
            if let Some(date) = record.sent_date {
                last_contact
                    .entry(key.clone())
                    .and_modify(|d| *d = (*d).max(date))
                    .or_insert(date);
            }
            history.insert(key);
        }
        Self {
            policy,
            history,
            last_contact,
            session: HashSet::new(),
        }
    }

    /// Check a candidate recipient against session and history.
    pub fn check(&self, address: &str, today: NaiveDate) -> SendVerdict {
        let key = normalize_email(address);
        if self.session.contains(&key) {
            return SendVerdict::DuplicateThisSession;
        }
        match self.policy {
            GuardPolicy::Forever => {
                if self.history.contains(&key) {
                    return SendVerdict::AlreadyContacted;
                }
            }
            GuardPolicy::Cooldown { days } => {
                if let Some(last) = self.last_contact.get(&key) {
                    let days_ago = (today - *last).num_days();
                    if days_ago < days {
                        return SendVerdict::WithinCooldown { days_ago };
                    }
                } else if self.history.contains(&key) {
                    return SendVerdict::AlreadyContacted;
                }
            }
        }
        SendVerdict::Fresh
    }

    /// Record a successful dispatch so later checks in the same run see it.
    pub fn record_send(&mut self, address: &str) {
        self.session.insert(normalize_email(address));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::audit::{AuditStatus, SocialLinks};

    fn sent_record(email: &str, date: Option<NaiveDate>) -> AuditRecord {
        let mut record = AuditRecord::from_analysis(
            "https://a.com",
            "summary",
            Some(email.to_string()),
            SocialLinks::default(),
        );
        record.status = AuditStatus::Sent;
        record.sent_date = date;
        record
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn history_blocks_resend_forever() {
        let guard = SendGuard::from_history(&[sent_record("Info@Biz.com", None)], GuardPolicy::Forever);
        assert_eq!(guard.check("  info@biz.com ", today()), SendVerdict::AlreadyContacted);
        assert_eq!(guard.check("fresh@biz.com", today()), SendVerdict::Fresh);
    }

    #[test]
    fn followed_up_and_replied_also_count_as_contacted() {
        let mut followed = sent_record("a@biz.com", None);
        followed.status = AuditStatus::FollowedUp;
        let mut replied = sent_record("b@biz.com", None);
        replied.status = AuditStatus::Replied;
        let guard = SendGuard::from_history(&[followed, replied], GuardPolicy::Forever);
        assert_eq!(guard.check("a@biz.com", today()), SendVerdict::AlreadyContacted);
        assert_eq!(guard.check("b@biz.com", today()), SendVerdict::AlreadyContacted);
    }

    #[test]
    fn pre_send_statuses_do_not_block() {
        let mut record = sent_record("a@biz.com", None);
        record.status = AuditStatus::Analyzed;
        let guard = SendGuard::from_history(&[record], GuardPolicy::Forever);
        assert_eq!(guard.check("a@biz.com", today()), SendVerdict::Fresh);
    }

    #[test]
    fn session_duplicate_is_caught_before_history() {
        let mut guard = SendGuard::from_history(&[], GuardPolicy::Forever);
        assert!(guard.check("a@biz.com", today()).permits_send());
        guard.record_send("A@Biz.com");
        assert_eq!(guard.check("a@biz.com", today()), SendVerdict::DuplicateThisSession);
    }

    #[test]
    fn cooldown_frees_old_contacts_and_blocks_recent_ones() {
        let recent = sent_record("recent@biz.com", NaiveDate::from_ymd_opt(2026, 7, 20));
        let old = sent_record("old@biz.com", NaiveDate::from_ymd_opt(2026, 1, 1));
        let undated = sent_record("undated@biz.com", None);
        let guard =
            SendGuard::from_history(&[recent, old, undated], GuardPolicy::Cooldown { days: 30 });

        assert_eq!(
            guard.check("recent@biz.com", today()),
            SendVerdict::WithinCooldown { days_ago: 18 }
        );
        assert_eq!(guard.check("old@biz.com", today()), SendVerdict::Fresh);
        assert_eq!(guard.check("undated@biz.com", today()), SendVerdict::AlreadyContacted);
    }
}
