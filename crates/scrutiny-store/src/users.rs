//! User directory and system audit log.
//!
//! A thin, file-backed user subsystem: the roster lives in
//! `local_users.json`, the active session in `current_user.json`, and every
//! authentication or user-management event is appended to
//! `audit_log.jsonl` (one JSON document per line, never rewritten).
//!
//! Authentication is a mock for local development: `login` looks the user
//! up by email and stamps the login time. There are no passwords and no
//! third-party calls here.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use scrutiny_core::entities::{AuditLogEntry, User};
use scrutiny_core::enums::{AuditLogEvent, Role};
use scrutiny_core::errors::CoreError;
use scrutiny_core::ids::{self, PREFIX_LOG, PREFIX_USER};

use crate::error::{ServiceError, StoreError};

const USERS_FILE: &str = "local_users.json";
const CURRENT_USER_FILE: &str = "current_user.json";
const AUDIT_LOG_FILE: &str = "audit_log.jsonl";

/// File-backed user roster with an append-only event log.
#[derive(Debug)]
pub struct UserDirectory {
    data_dir: PathBuf,
    users: Vec<User>,
}

impl UserDirectory {
    /// Open (and create if needed) the directory under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the directory cannot be created or the
    /// roster fails to parse.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let roster = data_dir.join(USERS_FILE);
        let users = if roster.exists() {
            serde_json::from_str(&fs::read_to_string(&roster)?)?
        } else {
            Vec::new()
        };
        Ok(Self { data_dir, users })
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    /// Register a new user and record the event.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank or already-registered email, `StoreError`
    /// when persistence fails.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        role: Role,
        is_admin: bool,
    ) -> Result<User, ServiceError> {
        if email.trim().is_empty() {
            return Err(CoreError::Validation("user email is required".into()).into());
        }
        if self.find_by_email(email).is_some() {
            return Err(
                CoreError::Validation(format!("user {email} is already registered")).into(),
            );
        }

        let user = User {
            id: ids::generate_id(PREFIX_USER),
            name: name.to_string(),
            email: email.to_string(),
            role,
            is_admin,
            last_login_at: None,
        };
        let mut roster = self.users.clone();
        roster.push(user.clone());
        self.persist_roster(&roster)?;
        self.users = roster;

        self.append_event(email, AuditLogEvent::UserCreated, None)?;
        Ok(user)
    }

    /// Update roster fields for `email`. `None` leaves a field unchanged.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown email, `StoreError` when persistence
    /// fails.
    pub fn update_user(
        &mut self,
        email: &str,
        name: Option<&str>,
        role: Option<Role>,
        is_admin: Option<bool>,
    ) -> Result<User, ServiceError> {
        let mut roster = self.users.clone();
        let user = roster
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| user_not_found(email))?;
        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(is_admin) = is_admin {
            user.is_admin = is_admin;
        }
        let updated = user.clone();

        self.persist_roster(&roster)?;
        self.users = roster;
        self.append_event(email, AuditLogEvent::UserUpdated, None)?;
        Ok(updated)
    }

    /// Remove a user from the roster. Returns `false` for an unknown email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when persistence fails.
    pub fn delete_user(&mut self, email: &str) -> Result<bool, ServiceError> {
        if self.find_by_email(email).is_none() {
            return Ok(false);
        }
        let roster: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.email != email)
            .cloned()
            .collect();
        self.persist_roster(&roster)?;
        self.users = roster;
        self.append_event(email, AuditLogEvent::UserDeleted, None)?;
        Ok(true)
    }

    /// Mock sign-in: look the user up, stamp the login time, store the
    /// session, record the event. A failed attempt is recorded too.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown email, `StoreError` when persistence
    /// fails.
    pub fn login(&mut self, email: &str) -> Result<User, ServiceError> {
        if self.find_by_email(email).is_none() {
            self.append_event(email, AuditLogEvent::LoginFailed, Some("unknown email"))?;
            return Err(user_not_found(email).into());
        }

        let mut roster = self.users.clone();
        // The email was just found; the roster copy still contains it.
        let user = roster
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| user_not_found(email))?;
        user.last_login_at = Some(Utc::now());
        let signed_in = user.clone();

        self.persist_roster(&roster)?;
        self.users = roster;
        self.write_current(Some(&signed_in))?;
        self.append_event(email, AuditLogEvent::LoginSucceeded, None)?;
        Ok(signed_in)
    }

    /// Clear the stored session and record the event.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when persistence fails.
    pub fn logout(&mut self) -> Result<(), ServiceError> {
        let actor = self
            .current_user()?
            .map_or_else(|| "anonymous".to_string(), |u| u.email);
        self.write_current(None)?;
        self.append_event(&actor, AuditLogEvent::Logout, None)?;
        Ok(())
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the session document fails to parse.
    pub fn current_user(&self) -> Result<Option<User>, StoreError> {
        let path = self.data_dir.join(CURRENT_USER_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Read the most recent system audit-log events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the log fails to read or parse.
    pub fn events(&self, limit: usize) -> Result<Vec<AuditLogEntry>, StoreError> {
        let path = self.audit_log_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<AuditLogEntry> = serde_jsonlines::json_lines(&path)?
            .collect::<Result<Vec<_>, _>>()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    fn audit_log_path(&self) -> PathBuf {
        self.data_dir.join(AUDIT_LOG_FILE)
    }

    fn persist_roster(&self, roster: &[User]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(roster)?;
        fs::write(self.data_dir.join(USERS_FILE), json)?;
        Ok(())
    }

    fn write_current(&self, user: Option<&User>) -> Result<(), StoreError> {
        let path = self.data_dir.join(CURRENT_USER_FILE);
        match user {
            Some(user) => fs::write(&path, serde_json::to_vec_pretty(user)?)?,
            None => {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
            }
        }
        Ok(())
    }

    fn append_event(
        &self,
        actor: &str,
        event: AuditLogEvent,
        detail: Option<&str>,
    ) -> Result<(), StoreError> {
        let entry = AuditLogEntry {
            id: ids::generate_id(PREFIX_LOG),
            occurred_at: Utc::now(),
            actor: actor.to_string(),
            event,
            detail: detail.map(String::from),
        };
        serde_jsonlines::append_json_lines(self.audit_log_path(), [entry])?;
        Ok(())
    }
}

fn user_not_found(email: &str) -> CoreError {
    CoreError::NotFound {
        entity_type: "user".into(),
        id: email.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn directory() -> (UserDirectory, TempDir) {
        let dir = TempDir::new().unwrap();
        let directory = UserDirectory::open(dir.path()).unwrap();
        (directory, dir)
    }

    #[test]
    fn roster_survives_reopen() {
        let (mut directory, dir) = directory();
        directory
            .create_user("Dana Levi", "dana@example.com", Role::Auditor, false)
            .unwrap();

        let reopened = UserDirectory::open(dir.path()).unwrap();
        assert_eq!(reopened.users().len(), 1);
        assert_eq!(reopened.users()[0].name, "Dana Levi");
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (mut directory, _dir) = directory();
        directory
            .create_user("Dana", "dana@example.com", Role::Auditor, false)
            .unwrap();
        let err = directory
            .create_user("Other Dana", "dana@example.com", Role::Manager, false)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn login_stamps_time_and_stores_session() {
        let (mut directory, _dir) = directory();
        directory
            .create_user("Dana", "dana@example.com", Role::Auditor, false)
            .unwrap();

        let user = directory.login("dana@example.com").unwrap();
        assert!(user.last_login_at.is_some());
        assert_eq!(
            directory.current_user().unwrap().unwrap().email,
            "dana@example.com"
        );

        directory.logout().unwrap();
        assert!(directory.current_user().unwrap().is_none());
    }

    #[test]
    fn failed_login_is_recorded_not_signed_in() {
        let (mut directory, _dir) = directory();
        let err = directory.login("ghost@example.com").unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));
        assert!(directory.current_user().unwrap().is_none());

        let events = directory.events(10).unwrap();
        assert_eq!(events[0].event, AuditLogEvent::LoginFailed);
    }

    #[test]
    fn event_log_is_append_only_and_newest_first() {
        let (mut directory, _dir) = directory();
        directory
            .create_user("Dana", "dana@example.com", Role::Auditor, false)
            .unwrap();
        directory.login("dana@example.com").unwrap();
        directory
            .update_user("dana@example.com", None, Some(Role::Manager), None)
            .unwrap();
        directory.delete_user("dana@example.com").unwrap();

        let events = directory.events(10).unwrap();
        let kinds: Vec<AuditLogEvent> = events.iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            vec![
                AuditLogEvent::UserDeleted,
                AuditLogEvent::UserUpdated,
                AuditLogEvent::LoginSucceeded,
                AuditLogEvent::UserCreated,
            ]
        );

        assert_eq!(directory.events(2).unwrap().len(), 2);
    }

    #[test]
    fn delete_unknown_user_is_false() {
        let (mut directory, _dir) = directory();
        assert!(!directory.delete_user("ghost@example.com").unwrap());
    }
}
