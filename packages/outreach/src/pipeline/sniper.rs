//! Sniper stage: dispatch outreach to analyzed leads, at most once per
//! recipient, with the audit attached.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::compose::{outreach_body, outreach_subject, SenderIdentity};
use crate::contact::{ContactContext, ResolutionChain};
use crate::dedup::canonical_domain;
use crate::error::Result;
use crate::guard::{GuardPolicy, SendGuard};
use crate::ledger::LedgerStore;
use crate::state::try_advance_audit;
use crate::traits::mail::{Attachment, MailTransport, OutboundMail};
use crate::types::audit::AuditStatus;
use crate::types::profile::ProfileBook;
use crate::types::ClientKey;

#[derive(Debug, Clone)]
pub struct SniperConfig {
    /// PDF attached to each outreach message. Missing file: send anyway,
    /// `Audit Attached` stays false.
    pub attachment_path: Option<PathBuf>,
    /// Inclusive bounds, in seconds, of the randomized pause after each
    /// successful send. Outbound throttle, not correctness - set `(0, 0)`
    /// to disable.
    pub throttle_secs: (u64, u64),
    pub guard_policy: GuardPolicy,
    pub sender: SenderIdentity,
}

impl Default for SniperConfig {
    fn default() -> Self {
        Self {
            attachment_path: None,
            throttle_secs: (30, 60),
            guard_policy: GuardPolicy::Forever,
            sender: SenderIdentity::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SniperReport {
    pub sent: usize,
    pub attached: usize,
    pub skipped: usize,
    pub no_email: usize,
    pub failed: usize,
    pub errors: usize,
}

/// The outreach dispatcher.
pub struct Sniper {
    ledger: Arc<dyn LedgerStore>,
    transport: Arc<dyn MailTransport>,
    enrichment: Option<ResolutionChain>,
    profiles: ProfileBook,
    config: SniperConfig,
}

impl Sniper {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        transport: Arc<dyn MailTransport>,
        enrichment: Option<ResolutionChain>,
        profiles: ProfileBook,
        config: SniperConfig,
    ) -> Self {
        Self {
            ledger,
            transport,
            enrichment,
            profiles,
            config,
        }
    }

    fn load_attachment(&self) -> Option<Attachment> {
        let path = self.config.attachment_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(Attachment {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "audit.pdf".to_string()),
                bytes,
            }),
            Err(err) => {
                // Outreach still goes out; the record just won't claim an
                // attachment it didn't carry.
                error!(target: "sniper", path = %path.display(), %err, "audit attachment unreadable, sending without it");
                None
            }
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

    /// Dispatch to every pending audit row. The store is rewritten after
    /// every record - crash resilience over throughput.
    pub async fn run(&self, client: &ClientKey) -> Result<SniperReport> {
        let mut audits = self.ledger.load_audits(client).await?;
        let pending: Vec<usize> = audits
            .iter()
            .enumerate()
            .filter(|(_, r)| r.status.is_pending_send())
            .map(|(i, _)| i)
            .collect();

        let mut report = SniperReport::default();
        if pending.is_empty() {
            info!(target: "sniper", "no pending audits to send");
            return Ok(report);
        }
        info!(target: "sniper", pending = pending.len(), "audits ready to send");

        let mut guard = SendGuard::from_history(&audits, self.config.guard_policy);
        let profile = self.profiles.get(client).clone();
        let attachment = self.load_attachment();
        let today = chrono::Local::now().date_naive();

        for idx in pending {
            let record = &mut audits[idx];

            // Resolve the recipient, enriching when analysis left a gap.
            let email = match record.email.as_deref().filter(|e| !e.trim().is_empty()) {
                Some(e) => Some(e.to_string()),
                None => {
                    let domain = canonical_domain(&record.url);
                    let resolved = match &self.enrichment {
                        Some(chain) => {
                            chain
                                .resolve(&ContactContext {
                                    site_url: &record.url,
                                    domain: &domain,
                                    page_text: None,
                                })
                                .await
                        }
                        None => None,
                    };
                    if let Some(found) = &resolved {
                        record.email = Some(found.clone());
                    }
                    resolved
                }
            };

            let Some(email) = email else {
                warn!(target: "sniper", url = %record.url, "no contact email, marking dead end");
                if try_advance_audit(record, AuditStatus::DeadEndNoEmail) {
                    report.no_email += 1;
                }
                self.ledger.save_audits(client, &audits).await?;
                continue;
            };

            let verdict = guard.check(&email, today);
            if !verdict.permits_send() {
                warn!(target: "sniper", %email, ?verdict, "recipient blocked by send guard");
                if try_advance_audit(record, AuditStatus::SkippedPreviouslySent) {
                    report.skipped += 1;
                }
                self.ledger.save_audits(client, &audits).await?;
                continue;
            }

            let mut mail = OutboundMail::new(
                email.clone(),
                outreach_subject(&record.url),
                outreach_body(
                    &record.url,
                    &record.pain_point_summary,
                    &profile,
                    &self.config.sender,
                ),
            );
            if let Some(attachment) = &attachment {
                mail = mail.with_attachment(attachment.clone());
            }
            let has_attachment = mail.attachment.is_some();

            let sent = match self.transport.send(&mail).await {
                Ok(sent) => sent,
                Err(err) => {
                    // Per-record boundary: one record's failure never stops
                    // the batch.
                    error!(target: "sniper", %email, %err, "unexpected dispatch failure");
                    try_advance_audit(record, AuditStatus::Error);
                    report.errors += 1;
                    self.ledger.save_audits(client, &audits).await?;
                    continue;
                }
            };

            if sent {
                record.sent_date = Some(today);
                record.audit_attached = has_attachment;
                try_advance_audit(record, AuditStatus::Sent);
                guard.record_send(&email);
                report.sent += 1;
                if has_attachment {
                    report.attached += 1;
                }
                info!(target: "sniper", %email, attached = has_attachment, "outreach sent");
                self.ledger.save_audits(client, &audits).await?;
                self.throttle().await;
            } else {
                warn!(target: "sniper", %email, url = %record.url, "dispatch refused");
                try_advance_audit(record, AuditStatus::SendFailed);
                report.failed += 1;
                self.ledger.save_audits(client, &audits).await?;
            }
        }

        info!(
            target: "sniper",
            sent = report.sent,
            attached = report.attached,
            skipped = report.skipped,
            "outreach run complete"
        );
        Ok(report)
    }
}
