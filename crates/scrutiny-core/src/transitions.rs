//! Status-log entry construction and the archive rules.
//!
//! Every accepted mutation appends entries built here; nothing else writes
//! to an audit's status log. Entries record either a status transition or a
//! planned-date change. A single edit touching both appends two separate
//! entries, never one combined entry.

use chrono::{DateTime, Utc};

use crate::entities::StatusChange;
use crate::enums::AuditStatus;
use crate::ids::{self, PREFIX_CHANGE};

/// Reason stamped on the synthetic first entry of every audit.
pub const CREATED_REASON: &str = "audit created";
/// Reason stamped when restoring an audit from the archive.
pub const RESTORED_REASON: &str = "restored from archive";
/// Default reason when the caller leaves a status change unexplained.
pub const DEFAULT_STATUS_REASON: &str = "status update";
/// Default reason when the caller leaves a date change unexplained.
pub const DEFAULT_DATE_REASON: &str = "meeting date update";

/// Build a status-transition entry.
///
/// A blank or missing `reason` gets the generated default.
#[must_use]
pub fn status_entry(
    old_status: Option<AuditStatus>,
    new_status: AuditStatus,
    reason: Option<&str>,
    changed_by: &str,
) -> StatusChange {
    StatusChange {
        id: ids::generate_id(PREFIX_CHANGE),
        changed_at: Utc::now(),
        old_status,
        new_status: Some(new_status),
        old_date: None,
        new_date: None,
        reason: effective_reason(reason, DEFAULT_STATUS_REASON),
        changed_by: changed_by.to_string(),
    }
}

/// Build a date-only entry. Both status fields stay `None`.
#[must_use]
pub fn date_entry(
    old_date: Option<DateTime<Utc>>,
    new_date: Option<DateTime<Utc>>,
    reason: Option<&str>,
    changed_by: &str,
) -> StatusChange {
    StatusChange {
        id: ids::generate_id(PREFIX_CHANGE),
        changed_at: Utc::now(),
        old_status: None,
        new_status: None,
        old_date,
        new_date,
        reason: effective_reason(reason, DEFAULT_DATE_REASON),
        changed_by: changed_by.to_string(),
    }
}

/// The synthetic entry seeding every new audit's log:
/// `old_status: None, new_status: Received, reason: "audit created"`.
#[must_use]
pub fn initial_entry(changed_by: &str) -> StatusChange {
    status_entry(
        None,
        AuditStatus::initial(),
        Some(CREATED_REASON),
        changed_by,
    )
}

/// The entry appended when restoring from the archive: back to
/// `UnderReview`, regardless of which status preceded archiving.
#[must_use]
pub fn restore_entry(old_status: AuditStatus, changed_by: &str) -> StatusChange {
    status_entry(
        Some(old_status),
        AuditStatus::UnderReview,
        Some(RESTORED_REASON),
        changed_by,
    )
}

fn effective_reason(reason: Option<&str>, default: &str) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => r.trim().to_string(),
        _ => default.to_string(),
    }
}
