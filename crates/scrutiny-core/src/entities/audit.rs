use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Contact, StatusChange};
use crate::enums::AuditStatus;

/// One security-audit engagement record.
///
/// `status` is denormalized: it always mirrors the `new_status` of the most
/// recent status-bearing entry in `status_log`. The log itself is append-only
/// and chronological.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Audit {
    pub id: String,
    pub name: String,
    pub description: String,
    pub client_name: String,
    pub contacts: Vec<Contact>,
    pub received_at: DateTime<Utc>,
    pub planned_meeting_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: AuditStatus,
    pub status_log: Vec<StatusChange>,
    /// Email of the creating user.
    pub owner_id: String,
    pub owner_name: String,
    /// Stored explicitly on the remote backend; derived from `status` locally.
    pub is_archived: bool,
    /// Optimistic-concurrency counter, bumped by the remote backend on every
    /// write. Stays 0 on the local backend.
    #[serde(default)]
    pub version: i64,
}

impl Audit {
    /// Whether this audit belongs to the archive view.
    ///
    /// Pure derived predicate: archived iff the current status is
    /// [`AuditStatus::Completed`].
    #[must_use]
    pub const fn is_in_archive_view(&self) -> bool {
        self.status.is_archived()
    }

    /// The most recent log entry that carries a status (date-only entries
    /// are skipped).
    #[must_use]
    pub fn last_status_entry(&self) -> Option<&StatusChange> {
        self.status_log
            .iter()
            .rev()
            .find(|entry| entry.new_status.is_some())
    }

    /// Check the denormalization invariant: `status` equals the `new_status`
    /// of the most recent status-bearing log entry.
    #[must_use]
    pub fn log_is_consistent(&self) -> bool {
        self.last_status_entry()
            .and_then(|entry| entry.new_status)
            .is_some_and(|s| s == self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions;

    fn sample_audit() -> Audit {
        let first = transitions::initial_entry("Dana Levi");
        Audit {
            id: "aud-11111111".into(),
            name: "Q3 infrastructure audit".into(),
            description: String::new(),
            client_name: "Acme Corp".into(),
            contacts: Vec::new(),
            received_at: Utc::now(),
            planned_meeting_at: None,
            scheduled_at: None,
            status: AuditStatus::Received,
            status_log: vec![first],
            owner_id: "dana@example.com".into(),
            owner_name: "Dana Levi".into(),
            is_archived: false,
            version: 0,
        }
    }

    #[test]
    fn fresh_audit_log_is_consistent() {
        let audit = sample_audit();
        assert!(audit.log_is_consistent());
        assert!(!audit.is_in_archive_view());
    }

    #[test]
    fn last_status_entry_skips_date_only_entries() {
        let mut audit = sample_audit();
        audit.status_log.push(transitions::date_entry(
            None,
            Some(Utc::now()),
            None,
            "Dana Levi",
        ));
        let last = audit.last_status_entry().unwrap();
        assert_eq!(last.new_status, Some(AuditStatus::Received));
        assert!(audit.log_is_consistent());
    }

    #[test]
    fn archive_view_follows_status() {
        let mut audit = sample_audit();
        audit.status = AuditStatus::Completed;
        assert!(audit.is_in_archive_view());
        audit.status = AuditStatus::UnderReview;
        assert!(!audit.is_in_archive_view());
    }

    #[test]
    fn serde_round_trip_preserves_everything() {
        let mut audit = sample_audit();
        audit.planned_meeting_at = Some("2026-09-01T09:30:00Z".parse().unwrap());
        audit.contacts.push(Contact {
            id: "con-22222222".into(),
            first_name: "Noa".into(),
            last_name: "Barak".into(),
            role: "CISO".into(),
            email: "noa@acme.example".into(),
            phone: "+972-50-0000000".into(),
            gender: crate::enums::Gender::Female,
        });

        let json = serde_json::to_string(&audit).unwrap();
        let back: Audit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, audit);
    }
}
