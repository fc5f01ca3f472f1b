use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// An authenticated actor.
///
/// Users do not own audits structurally; `Audit::owner_id` is a
/// foreign-key-like string equal to the creating user's email.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Explicit admin flag, independent of `role` for imported accounts.
    pub is_admin: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Unrestricted access: either the admin flag or the `SystemAdmin` role.
    #[must_use]
    pub fn is_system_admin(&self) -> bool {
        self.is_admin || self.role == Role::SystemAdmin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_flag_and_role_both_grant_admin() {
        let mut user = User {
            id: "usr-00000000".into(),
            name: "Dana Levi".into(),
            email: "dana@example.com".into(),
            role: Role::Auditor,
            is_admin: false,
            last_login_at: None,
        };
        assert!(!user.is_system_admin());

        user.is_admin = true;
        assert!(user.is_system_admin());

        user.is_admin = false;
        user.role = Role::SystemAdmin;
        assert!(user.is_system_admin());
    }
}
