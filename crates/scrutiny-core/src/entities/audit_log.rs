use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AuditLogEvent;

/// An append-only system audit-log entry.
///
/// Records authentication and user-management events. Never mutated or
/// deleted by normal flow. Not to be confused with
/// [`crate::entities::StatusChange`], which logs one audit's workflow.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
    /// Email of the acting (or targeted) user.
    pub actor: String,
    pub event: AuditLogEvent,
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let entry = AuditLogEntry {
            id: "log-deadbeef".into(),
            occurred_at: "2026-08-01T08:00:00Z".parse().unwrap(),
            actor: "dana@example.com".into(),
            event: AuditLogEvent::LoginSucceeded,
            detail: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
