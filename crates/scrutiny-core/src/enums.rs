//! Status, role, and event enums for Scrutiny.
//!
//! `AuditStatus` serializes as the exact variant name (`"InWriting"`, not
//! `"in_writing"`): the seven values double as storage values and display
//! labels, so they must round-trip byte-identical. The smaller bookkeeping
//! enums use `snake_case` serialization.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AuditStatus
// ---------------------------------------------------------------------------

/// Workflow status of an audit engagement.
///
/// The seven states in the workflow's natural order:
///
/// ```text
/// Received → CoordinationEmailSentToAdmin → Scheduled → InWriting
///          → AwaitingAdminAnswers → UnderReview → Completed
/// ```
///
/// The order is advisory, not enforced: any state may move to any other
/// state. The constraint layer is role-based; see
/// [`crate::permissions::can_set_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AuditStatus {
    Received,
    CoordinationEmailSentToAdmin,
    Scheduled,
    InWriting,
    AwaitingAdminAnswers,
    UnderReview,
    Completed,
}

impl AuditStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 7] = [
        Self::Received,
        Self::CoordinationEmailSentToAdmin,
        Self::Scheduled,
        Self::InWriting,
        Self::AwaitingAdminAnswers,
        Self::UnderReview,
        Self::Completed,
    ];

    /// The status every freshly created audit starts in.
    #[must_use]
    pub const fn initial() -> Self {
        Self::Received
    }

    /// Return the string stored in both backends and shown in the UI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::CoordinationEmailSentToAdmin => "CoordinationEmailSentToAdmin",
            Self::Scheduled => "Scheduled",
            Self::InWriting => "InWriting",
            Self::AwaitingAdminAnswers => "AwaitingAdminAnswers",
            Self::UnderReview => "UnderReview",
            Self::Completed => "Completed",
        }
    }

    /// Whether an audit in this status belongs to the archive view.
    #[must_use]
    pub const fn is_archived(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Auditor,
    Manager,
    SystemAdmin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auditor => "auditor",
            Self::Manager => "manager",
            Self::SystemAdmin => "system_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Contact gender, used only to pick the salutation in generated email text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditLogEvent
// ---------------------------------------------------------------------------

/// Authentication and user-management events recorded in the system audit log.
///
/// Distinct from [`crate::entities::StatusChange`], which tracks one audit's
/// workflow. These events track the user subsystem itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditLogEvent {
    LoginSucceeded,
    LoginFailed,
    Logout,
    UserCreated,
    UserUpdated,
    UserDeleted,
    PasswordReset,
}

impl AuditLogEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginSucceeded => "login_succeeded",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::UserCreated => "user_created",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for AuditLogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Assert an enum variant serializes to the given string and back.
    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected:literal) => {
            #[test]
            fn $name() {
                let json = serde_json::to_string(&$variant).unwrap();
                assert_eq!(json, concat!("\"", $expected, "\""));
                let back: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(back, $variant);
            }
        };
    }

    test_serde_roundtrip!(
        status_received,
        AuditStatus,
        AuditStatus::Received,
        "Received"
    );
    test_serde_roundtrip!(
        status_coordination_email,
        AuditStatus,
        AuditStatus::CoordinationEmailSentToAdmin,
        "CoordinationEmailSentToAdmin"
    );
    test_serde_roundtrip!(
        status_awaiting_answers,
        AuditStatus,
        AuditStatus::AwaitingAdminAnswers,
        "AwaitingAdminAnswers"
    );
    test_serde_roundtrip!(
        status_completed,
        AuditStatus,
        AuditStatus::Completed,
        "Completed"
    );

    test_serde_roundtrip!(role_auditor, Role, Role::Auditor, "auditor");
    test_serde_roundtrip!(role_system_admin, Role, Role::SystemAdmin, "system_admin");

    test_serde_roundtrip!(gender_female, Gender, Gender::Female, "female");

    test_serde_roundtrip!(
        event_login_failed,
        AuditLogEvent,
        AuditLogEvent::LoginFailed,
        "login_failed"
    );
    test_serde_roundtrip!(
        event_user_deleted,
        AuditLogEvent,
        AuditLogEvent::UserDeleted,
        "user_deleted"
    );

    #[test]
    fn every_status_round_trips_byte_identical() {
        for status in AuditStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: AuditStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn only_completed_is_archived() {
        for status in AuditStatus::ALL {
            assert_eq!(status.is_archived(), status == AuditStatus::Completed);
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            format!("{}", AuditStatus::CoordinationEmailSentToAdmin),
            "CoordinationEmailSentToAdmin"
        );
        assert_eq!(format!("{}", AuditStatus::InWriting), "InWriting");
        assert_eq!(format!("{}", Role::Manager), "manager");
        assert_eq!(format!("{}", AuditLogEvent::PasswordReset), "password_reset");
    }

    #[test]
    fn initial_status_is_received() {
        assert_eq!(AuditStatus::initial(), AuditStatus::Received);
    }
}
