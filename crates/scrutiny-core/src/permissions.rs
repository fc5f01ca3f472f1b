//! Permission predicates.
//!
//! Pure functions of `(acting user, audit owner)`, kept in one place so the
//! authorization rules stay centrally testable. The aggregate manager
//! evaluates these before every mutation; storage never re-checks them.

use crate::entities::User;
use crate::enums::{AuditStatus, Role};

/// May `actor` edit an audit owned by `owner_id`?
///
/// System admins and managers may edit any audit; auditors only their own.
#[must_use]
pub fn can_edit(actor: &User, owner_id: &str) -> bool {
    actor.is_system_admin() || actor.role == Role::Manager || owns(actor, owner_id)
}

/// May `actor` delete an audit owned by `owner_id`?
///
/// System admins, or the owning auditor. Managers without admin rights can
/// never delete.
#[must_use]
pub fn can_delete(actor: &User, owner_id: &str) -> bool {
    actor.is_system_admin() || (actor.role == Role::Auditor && owns(actor, owner_id))
}

/// May `actor` set an audit owned by `owner_id` to `target`?
///
/// - System admins: any status.
/// - The owner: any status on their own audits.
/// - Non-owning managers: only `UnderReview` or `Completed`.
/// - Everyone else: denied.
#[must_use]
pub fn can_set_status(actor: &User, owner_id: &str, target: AuditStatus) -> bool {
    if actor.is_system_admin() || owns(actor, owner_id) {
        return true;
    }
    actor.role == Role::Manager
        && matches!(target, AuditStatus::UnderReview | AuditStatus::Completed)
}

fn owns(actor: &User, owner_id: &str) -> bool {
    actor.email == owner_id
}
