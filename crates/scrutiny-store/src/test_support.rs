//! Shared test utilities for scrutiny-store unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::Utc;
    use tempfile::TempDir;

    use scrutiny_core::entities::{Audit, Contact, User};
    use scrutiny_core::enums::{AuditStatus, Gender, Role};
    use scrutiny_core::ids::{self, PREFIX_AUDIT, PREFIX_CONTACT, PREFIX_USER};
    use scrutiny_core::transitions;

    use crate::local::LocalStore;
    use crate::service::{AuditDraft, AuditManager};

    /// A local store over a throwaway directory. Keep the `TempDir` alive
    /// for the duration of the test.
    pub fn local_store() -> (LocalStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (store, dir)
    }

    /// A manager over a fresh local store.
    pub async fn local_manager() -> (AuditManager<LocalStore>, TempDir) {
        let (store, dir) = local_store();
        (AuditManager::load(store).await.unwrap(), dir)
    }

    pub fn auditor(email: &str) -> User {
        user(email, Role::Auditor)
    }

    pub fn manager_user(email: &str) -> User {
        user(email, Role::Manager)
    }

    fn user(email: &str, role: Role) -> User {
        User {
            id: ids::generate_id(PREFIX_USER),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.into(),
            role,
            is_admin: false,
            last_login_at: None,
        }
    }

    pub fn contact(first: &str, email: &str) -> Contact {
        Contact {
            id: ids::generate_id(PREFIX_CONTACT),
            first_name: first.into(),
            last_name: String::new(),
            role: String::new(),
            email: email.into(),
            phone: String::new(),
            gender: Gender::Female,
        }
    }

    /// A valid creation draft with one contact.
    pub fn draft(name: &str, client: &str) -> AuditDraft {
        AuditDraft {
            name: name.into(),
            description: String::new(),
            client_name: client.into(),
            contacts: vec![contact("Noa", "noa@client.example")],
            planned_meeting_at: None,
            scheduled_at: None,
        }
    }

    /// A fully formed audit, bypassing the manager (for raw store tests).
    pub fn draft_audit(owner: &str, owner_name: &str) -> Audit {
        Audit {
            id: ids::generate_id(PREFIX_AUDIT),
            name: "Perimeter review".into(),
            description: String::new(),
            client_name: "Acme Corp".into(),
            contacts: vec![contact("Noa", "noa@client.example")],
            received_at: Utc::now(),
            planned_meeting_at: None,
            scheduled_at: None,
            status: AuditStatus::Received,
            status_log: vec![transitions::initial_entry(owner_name)],
            owner_id: owner.into(),
            owner_name: owner_name.into(),
            is_archived: false,
            version: 0,
        }
    }
}
