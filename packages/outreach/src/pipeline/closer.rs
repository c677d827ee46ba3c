//! Closer stage: detect replies, classify them, and follow up once.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::compose::{followup_body, followup_subject, SenderIdentity};
use crate::error::Result;
use crate::ledger::LedgerStore;
use crate::state::try_advance_audit;
use crate::traits::classifier::{ReplyClassifier, ReplyIntent};
use crate::traits::mail::{MailTransport, MailboxReader, OutboundMail};
use crate::types::audit::{AuditRecord, AuditStatus};
use crate::types::ClientKey;

#[derive(Debug, Clone)]
pub struct CloserConfig {
    /// Days after `Sent Date` before a silent recipient gets the follow-up.
    pub followup_after_days: i64,
    /// Same throttle semantics as the outreach stage.
    pub throttle_secs: (u64, u64),
    pub sender: SenderIdentity,
}

impl Default for CloserConfig {
    fn default() -> Self {
        Self {
            followup_after_days: 3,
            throttle_secs: (30, 60),
            sender: SenderIdentity::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CloserReport {
    pub replies: usize,
    pub hot_leads: usize,
    pub not_interested: usize,
    pub dead: usize,
    pub followups: usize,
}

impl CloserReport {
    fn tally(&mut self, status: AuditStatus) {
        match status {
            AuditStatus::HotLead => self.hot_leads += 1,
            AuditStatus::NotInterested => self.not_interested += 1,
            AuditStatus::Dead => self.dead += 1,
            _ => self.replies += 1,
        }
    }
}

/// Reply detection and the single automatic follow-up.
pub struct Closer {
    ledger: Arc<dyn LedgerStore>,
    mailbox: Arc<dyn MailboxReader>,
    transport: Arc<dyn MailTransport>,
    classifier: Arc<dyn ReplyClassifier>,
    config: CloserConfig,
}

impl Closer {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        mailbox: Arc<dyn MailboxReader>,
        transport: Arc<dyn MailTransport>,
        classifier: Arc<dyn ReplyClassifier>,
        config: CloserConfig,
    ) -> Self {
        Self {
            ledger,
            mailbox,
            transport,
            classifier,
            config,
        }
    }

    async fn throttle(&self) {
        let (lo, hi) = self.config.throttle_secs;
        if hi == 0 {
            return;
        }
        let secs = if hi > lo { fastrand::u64(lo..=hi) } else { lo };
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    /// Classify the latest reply body; no readable body means the default
    /// `Replied` bucket - classification never blocks a transition.
    async fn classify_reply(&self, address: &str) -> AuditStatus {
        match self.mailbox.latest_body_from(address).await {
            Some(body) => self.classifier.classify(&body).await.as_status(),
            None => ReplyIntent::Replied.as_status(),
        }
    }

    /// One pass over the audit store: `Sent` rows past the follow-up window
    /// either graduate to a reply outcome or get the follow-up;
    /// `Followed Up` rows only ever graduate.
    pub async fn run(&self, client: &ClientKey) -> Result<CloserReport> {
        let mut audits = self.ledger.load_audits(client).await?;
        let mut report = CloserReport::default();
        if audits.is_empty() {
            info!(target: "closer", "no audit rows to check");
            return Ok(report);
        }

        // Stage-scoped: an unreachable mailbox fails this invocation before
        // any record is touched.
        self.mailbox.probe().await?;

        let today = chrono::Local::now().date_naive();
        let mut updated = false;

        for record in audits.iter_mut() {
            let Some(email) = record
                .email
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .map(str::to_string)
            else {
                continue;
            };

            match record.status {
                AuditStatus::Sent => {
                    let Some(sent_date) = record.sent_date else {
                        warn!(target: "closer", url = %record.url, "Sent row without a sent date, skipping");
                        continue;
                    };
                    let days_passed = (today - sent_date).num_days();
                    if days_passed < self.config.followup_after_days {
                        continue;
                    }
                    info!(target: "closer", %email, days_passed, "checking for reply");

                    let replied = match self.mailbox.has_reply_from(&email).await {
                        Ok(replied) => replied,
                        Err(err) => {
                            // Fail safe: if we can't check, assume they
                            // replied rather than risk spamming them.
                            warn!(target: "closer", %email, %err, "reply check failed, assuming replied");
                            true
                        }
                    };

                    if replied {
                        let status = self.classify_reply(&email).await;
                        if try_advance_audit(record, status) {
                            report.tally(status);
                            updated = true;
                            info!(target: "closer", %email, %status, "reply classified");
                        }
                    } else if self.send_followup(&email, record).await {
                        report.followups += 1;
                        updated = true;
                        self.throttle().await;
                    }
                }
                AuditStatus::FollowedUp => {
                    // One automatic follow-up only; from here the record
                    // can only graduate on a reply.
                    match self.mailbox.has_reply_from(&email).await {
                        Ok(true) => {
                            let status = self.classify_reply(&email).await;
                            if try_advance_audit(record, status) {
                                report.tally(status);
                                updated = true;
                                info!(target: "closer", %email, %status, "reply classified");
                            }
                        }
                        Ok(false) => {}
                        Err(err) => {
                            warn!(target: "closer", %email, %err, "reply check failed, leaving row for next pass");
                        }
                    }
                }
                _ => {}
            }
        }

        if updated {
            self.ledger.save_audits(client, &audits).await?;
            info!(
                target: "closer",
                followups = report.followups,
                replies = report.replies + report.hot_leads + report.not_interested + report.dead,
                "closer pass complete"
            );
        } else {
            info!(target: "closer", "no follow-ups needed at this time");
        }
        Ok(report)
    }

    async fn send_followup(&self, email: &str, record: &mut AuditRecord) -> bool {
        info!(target: "closer", %email, "no reply, sending follow-up");
        let mail = OutboundMail::new(
            email.to_string(),
            followup_subject(&record.url),
            followup_body(&record.url, &self.config.sender),
        );
        match self.transport.send(&mail).await {
            Ok(true) => try_advance_audit(record, AuditStatus::FollowedUp),
            Ok(false) => {
                warn!(target: "closer", %email, "follow-up dispatch refused");
                false
            }
            Err(err) => {
                warn!(target: "closer", %email, %err, "follow-up dispatch failed");
                false
            }
        }
    }
}
