//! Status state machines for lead and audit records.
//!
//! All transition legality lives here, in one place, instead of ad hoc
//! string comparisons scattered across stages. Transitions are
//! terminal-forward only: no edge ever points back toward an earlier state.

use thiserror::Error;
use tracing::warn;

use crate::types::audit::{AuditRecord, AuditStatus, SocialLinks};
use crate::types::lead::{LeadRecord, LeadStatus};

/// A transition the state machine does not allow.
///
/// Row-scoped data error: the caller logs it and moves on, it never aborts
/// a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("illegal status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub to: &'static str,
}

/// Legal lead transitions: `Unscanned -> Processed`, nothing else.
pub fn lead_can_transition(from: LeadStatus, to: LeadStatus) -> bool {
    matches!((from, to), (LeadStatus::Unscanned, LeadStatus::Processed))
}

/// Advance a lead record, rejecting anything but the single legal edge.
pub fn advance_lead(record: &mut LeadRecord, to: LeadStatus) -> Result<(), InvalidTransition> {
    if !lead_can_transition(record.status, to) {
        return Err(InvalidTransition {
            from: record.status.as_str(),
            to: to.as_str(),
        });
    }
    record.status = to;
    Ok(())
}

/// Creation-time status priority rule for a new audit record.
///
/// Email beats social beats contact form beats nothing.
pub fn creation_status(email: Option<&str>, socials: &SocialLinks) -> AuditStatus {
    if email.is_some_and(|e| !e.trim().is_empty()) {
        AuditStatus::Analyzed
    } else if socials.has_social() {
        AuditStatus::RequiresDm
    } else if socials.contact_page.is_some() {
        AuditStatus::UseForm
    } else {
        AuditStatus::DeadEnd
    }
}

/// Legal audit transitions.
///
/// `Send Failed` carries the same outgoing edges as `Analyzed` so a future
/// run can retry the dispatch.
pub fn audit_can_transition(from: AuditStatus, to: AuditStatus) -> bool {
    use AuditStatus::*;
    match from {
        Analyzed | SendFailed => matches!(
            to,
            Sent | SendFailed | SkippedPreviouslySent | Error | DeadEndNoEmail
        ),
        Sent => matches!(to, Replied | HotLead | NotInterested | Dead | FollowedUp),
        FollowedUp => matches!(to, Replied | HotLead | NotInterested | Dead),
        // Dead ends, skips, errors, and reply outcomes are terminal.
        DeadEnd | RequiresDm | UseForm | DeadEndNoEmail | SkippedPreviouslySent | Error
        | Replied | HotLead | NotInterested | Dead => false,
    }
}

/// Advance an audit record along a legal edge.
pub fn advance_audit(record: &mut AuditRecord, to: AuditStatus) -> Result<(), InvalidTransition> {
    if !audit_can_transition(record.status, to) {
        return Err(InvalidTransition {
            from: record.status.as_str(),
            to: to.as_str(),
        });
    }
    record.status = to;
    Ok(())
}

/// Advance an audit record, downgrading an illegal edge to a logged skip.
///
/// Returns whether the record changed. Used by stages that must keep the
/// batch moving past a row with drifted state.
pub fn try_advance_audit(record: &mut AuditRecord, to: AuditStatus) -> bool {
    match advance_audit(record, to) {
        Ok(()) => true,
        Err(err) => {
            warn!(target: "state", url = %record.url, %err, "skipping illegal transition");
            false
        }
    }
}
