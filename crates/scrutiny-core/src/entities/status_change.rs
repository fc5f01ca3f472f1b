use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AuditStatus;

/// One immutable entry in an audit's append-only status log.
///
/// An entry records either a status transition (`old_status`/`new_status`
/// populated) or a planned-date transition (`old_date`/`new_date` populated),
/// never all four `None`. Entries are never edited or removed once written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChange {
    pub id: String,
    pub changed_at: DateTime<Utc>,
    /// `None` only on the synthetic creation entry and on date-only entries.
    pub old_status: Option<AuditStatus>,
    /// `None` only when the entry records a date-only change.
    pub new_status: Option<AuditStatus>,
    pub old_date: Option<DateTime<Utc>>,
    pub new_date: Option<DateTime<Utc>>,
    pub reason: String,
    /// Display name of the user who made the change.
    pub changed_by: String,
}

impl StatusChange {
    /// Whether this entry records a status transition (as opposed to a
    /// date-only change).
    #[must_use]
    pub const fn is_status_entry(&self) -> bool {
        self.new_status.is_some()
    }

    /// Whether this entry records a planned-date change.
    #[must_use]
    pub const fn is_date_entry(&self) -> bool {
        self.old_date.is_some() || self.new_date.is_some()
    }

    /// An entry must record something: a status transition, a date change,
    /// or both in the degenerate imported case.
    #[must_use]
    pub const fn is_meaningful(&self) -> bool {
        self.is_status_entry() || self.is_date_entry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions;

    #[test]
    fn status_entry_classification() {
        let entry = transitions::status_entry(
            Some(AuditStatus::Received),
            AuditStatus::Scheduled,
            Some("kickoff booked"),
            "Dana Levi",
        );
        assert!(entry.is_status_entry());
        assert!(!entry.is_date_entry());
        assert!(entry.is_meaningful());
    }

    #[test]
    fn date_entry_classification() {
        let entry = transitions::date_entry(None, Some(Utc::now()), None, "Dana Levi");
        assert!(!entry.is_status_entry());
        assert!(entry.is_date_entry());
        assert!(entry.is_meaningful());
    }

    #[test]
    fn serde_round_trip() {
        let entry = transitions::status_entry(
            None,
            AuditStatus::Received,
            Some("audit created"),
            "Dana Levi",
        );
        let json = serde_json::to_string(&entry).unwrap();
        let back: StatusChange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
