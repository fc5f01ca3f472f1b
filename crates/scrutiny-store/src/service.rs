//! Audit aggregate manager.
//!
//! The single point through which all audit mutations flow. Every operation
//! follows the same protocol:
//! 1. Resolve and authorize the acting user
//! 2. Validate input
//! 3. Build the new state (log entries included) against a snapshot
//! 4. Persist via the active adapter
//! 5. Commit the stored result to the in-memory collection
//!
//! Persisting before committing gives the atomicity the callers rely on:
//! when storage rejects a write the in-memory collection is untouched, and
//! when it accepts, memory reflects exactly what was stored.

use chrono::{DateTime, Utc};

use scrutiny_core::entities::{Audit, Contact, User};
use scrutiny_core::enums::AuditStatus;
use scrutiny_core::errors::CoreError;
use scrutiny_core::ids::{self, PREFIX_AUDIT, PREFIX_CONTACT};
use scrutiny_core::{permissions, transitions};

use crate::AuditStore;
use crate::error::{ServiceError, StoreError};

/// Caller-supplied fields for a new audit.
#[derive(Debug, Clone, Default)]
pub struct AuditDraft {
    pub name: String,
    pub description: String,
    pub client_name: String,
    pub contacts: Vec<Contact>,
    pub planned_meeting_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Partial update applied by [`AuditManager::edit`].
///
/// `None` means "leave unchanged"; the double-`Option` date fields
/// distinguish "unchanged" from "cleared".
#[derive(Debug, Clone, Default)]
pub struct AuditEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub contacts: Option<Vec<Contact>>,
    pub planned_meeting_at: Option<Option<DateTime<Utc>>>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub status: Option<AuditStatus>,
    /// Free-text reason recorded on any log entries this edit appends.
    pub reason: Option<String>,
}

impl AuditEdit {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: AuditStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn planned_meeting_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.planned_meeting_at = Some(at);
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Which slice of the collection a read wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditView {
    /// Everything that is not archived.
    Active,
    /// Completed audits only.
    Archive,
    /// The whole collection.
    All,
}

/// Orchestrates audit mutations over the active persistence adapter while
/// keeping an in-memory view of the collection.
#[derive(Debug)]
pub struct AuditManager<S> {
    store: S,
    audits: Vec<Audit>,
}

impl<S: AuditStore> AuditManager<S> {
    /// Load the full collection from `store` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the initial load fails.
    pub async fn load(store: S) -> Result<Self, StoreError> {
        let audits = store.list(None).await?;
        Ok(Self { store, audits })
    }

    /// The in-memory collection, unfiltered.
    #[must_use]
    pub fn audits(&self) -> &[Audit] {
        &self.audits
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Audit> {
        self.audits.iter().find(|a| a.id == id)
    }

    /// Read a slice of the collection, optionally restricted to one owner.
    #[must_use]
    pub fn view(&self, view: AuditView, owner: Option<&str>) -> Vec<&Audit> {
        self.audits
            .iter()
            .filter(|a| match view {
                AuditView::Active => !a.is_in_archive_view(),
                AuditView::Archive => a.is_in_archive_view(),
                AuditView::All => true,
            })
            .filter(|a| owner.is_none_or(|o| a.owner_id == o))
            .collect()
    }

    /// Create a new audit owned by the acting user.
    ///
    /// Forces `status = Received` and seeds the log with the synthetic
    /// creation entry, whatever the draft says.
    ///
    /// # Errors
    ///
    /// `Validation` when required fields are missing, `PermissionDenied`
    /// when nobody is signed in, `StoreError` when persistence fails (the
    /// in-memory collection is left unchanged).
    pub async fn create(
        &mut self,
        draft: AuditDraft,
        actor: Option<&User>,
    ) -> Result<Audit, ServiceError> {
        let actor = require_user(actor, "create an audit")?;
        validate_draft(&draft)?;

        let audit = Audit {
            id: ids::generate_id(PREFIX_AUDIT),
            name: draft.name,
            description: draft.description,
            client_name: draft.client_name,
            contacts: with_contact_ids(draft.contacts),
            received_at: Utc::now(),
            planned_meeting_at: draft.planned_meeting_at,
            scheduled_at: draft.scheduled_at,
            status: AuditStatus::initial(),
            status_log: vec![transitions::initial_entry(&actor.name)],
            owner_id: actor.email.clone(),
            owner_name: actor.name.clone(),
            is_archived: false,
            version: 0,
        };

        self.store.create(&audit).await?;
        self.audits.push(audit.clone());
        Ok(audit)
    }

    /// Apply a partial edit.
    ///
    /// Diffs `status` and `planned_meeting_at` against the pre-edit
    /// snapshot; each changed field appends its own log entry (status entry
    /// first). Remaining fields merge shallowly.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied`, or a `StoreError`; in every failure
    /// case the in-memory collection keeps the pre-edit state.
    pub async fn edit(
        &mut self,
        id: &str,
        edit: AuditEdit,
        actor: Option<&User>,
    ) -> Result<Audit, ServiceError> {
        let actor = require_user(actor, "edit an audit")?;
        let current = self
            .get(id)
            .ok_or_else(|| CoreError::audit_not_found(id))?
            .clone();
        if !permissions::can_edit(actor, &current.owner_id) {
            return Err(CoreError::denied(&actor.email, format!("edit audit {id}")).into());
        }

        let mut merged = current.clone();
        if let Some(name) = edit.name {
            merged.name = name;
        }
        if let Some(description) = edit.description {
            merged.description = description;
        }
        if let Some(client_name) = edit.client_name {
            merged.client_name = client_name;
        }
        if let Some(contacts) = edit.contacts {
            merged.contacts = with_contact_ids(contacts);
        }
        if let Some(scheduled_at) = edit.scheduled_at {
            merged.scheduled_at = scheduled_at;
        }

        let reason = edit.reason.as_deref();
        if let Some(target) = edit.status {
            if target != current.status {
                if !permissions::can_set_status(actor, &current.owner_id, target) {
                    return Err(CoreError::denied(
                        &actor.email,
                        format!("set audit {id} to {target}"),
                    )
                    .into());
                }
                merged.status_log.push(transitions::status_entry(
                    Some(current.status),
                    target,
                    reason,
                    &actor.name,
                ));
                merged.status = target;
                merged.is_archived = target.is_archived();
            }
        }
        if let Some(new_date) = edit.planned_meeting_at {
            if new_date != current.planned_meeting_at {
                merged.status_log.push(transitions::date_entry(
                    current.planned_meeting_at,
                    new_date,
                    reason,
                    &actor.name,
                ));
                merged.planned_meeting_at = new_date;
            }
        }

        let stored = self.store.update(&merged).await?;
        self.commit(stored.clone());
        Ok(stored)
    }

    /// Delete an audit.
    ///
    /// Returns `Ok(false)` (state untouched) when the id is unknown.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` for anyone but a system admin or the owning
    /// auditor; managers can never delete.
    pub async fn delete(&mut self, id: &str, actor: Option<&User>) -> Result<bool, ServiceError> {
        let actor = require_user(actor, "delete an audit")?;
        let Some(current) = self.get(id) else {
            return Ok(false);
        };
        if !permissions::can_delete(actor, &current.owner_id) {
            return Err(CoreError::denied(&actor.email, format!("delete audit {id}")).into());
        }

        let removed = self.store.delete(id).await?;
        if removed {
            self.audits.retain(|a| a.id != id);
        }
        Ok(removed)
    }

    /// Move an audit to `new_status`, appending exactly one log entry.
    ///
    /// No-ops (returns `Ok(true)`, nothing appended) when the audit is
    /// already in `new_status`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied` per the role rules, or a
    /// `StoreError`; the audit is unmodified on every failure.
    pub async fn change_status(
        &mut self,
        id: &str,
        new_status: AuditStatus,
        reason: Option<&str>,
        actor: Option<&User>,
    ) -> Result<bool, ServiceError> {
        let actor = require_user(actor, "change an audit's status")?;
        let current = self
            .get(id)
            .ok_or_else(|| CoreError::audit_not_found(id))?
            .clone();
        if !permissions::can_set_status(actor, &current.owner_id, new_status) {
            return Err(CoreError::denied(
                &actor.email,
                format!("set audit {id} to {new_status}"),
            )
            .into());
        }
        if new_status == current.status {
            return Ok(true);
        }

        let entry =
            transitions::status_entry(Some(current.status), new_status, reason, &actor.name);
        let stored = self.store.update_status(id, &entry).await?;
        self.commit(stored);
        Ok(true)
    }

    /// Bring an archived audit back to `UnderReview`.
    ///
    /// # Errors
    ///
    /// `Validation` when the audit is not archived, plus the usual
    /// `NotFound`/`PermissionDenied`/`StoreError` cases.
    pub async fn restore_from_archive(
        &mut self,
        id: &str,
        actor: Option<&User>,
    ) -> Result<Audit, ServiceError> {
        let actor = require_user(actor, "restore an audit")?;
        let current = self
            .get(id)
            .ok_or_else(|| CoreError::audit_not_found(id))?
            .clone();
        if !current.is_in_archive_view() {
            return Err(
                CoreError::Validation(format!("audit {id} is not in the archive")).into(),
            );
        }
        if !permissions::can_set_status(actor, &current.owner_id, AuditStatus::UnderReview) {
            return Err(CoreError::denied(&actor.email, format!("restore audit {id}")).into());
        }

        let entry = transitions::restore_entry(current.status, &actor.name);
        let stored = self.store.update_status(id, &entry).await?;
        self.commit(stored.clone());
        Ok(stored)
    }

    fn commit(&mut self, stored: Audit) {
        match self.audits.iter_mut().find(|a| a.id == stored.id) {
            Some(slot) => *slot = stored,
            None => self.audits.push(stored),
        }
    }
}

fn require_user<'a>(actor: Option<&'a User>, action: &str) -> Result<&'a User, CoreError> {
    actor.ok_or_else(|| CoreError::denied("anonymous", action))
}

fn validate_draft(draft: &AuditDraft) -> Result<(), CoreError> {
    if draft.name.trim().is_empty() {
        return Err(CoreError::Validation("audit name is required".into()));
    }
    if draft.client_name.trim().is_empty() {
        return Err(CoreError::Validation("client name is required".into()));
    }
    if draft.contacts.is_empty() {
        return Err(CoreError::Validation(
            "an audit needs at least one contact".into(),
        ));
    }
    for contact in &draft.contacts {
        if !contact.is_valid() {
            return Err(CoreError::Validation(format!(
                "contact '{}' needs a first name or an email",
                contact.full_name()
            )));
        }
    }
    Ok(())
}

/// Fill in ids for contacts the caller supplied without one.
fn with_contact_ids(contacts: Vec<Contact>) -> Vec<Contact> {
    contacts
        .into_iter()
        .map(|mut c| {
            if c.id.is_empty() {
                c.id = ids::generate_id(PREFIX_CONTACT);
            }
            c
        })
        .collect()
}
