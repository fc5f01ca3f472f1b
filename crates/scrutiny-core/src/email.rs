//! Coordination email drafting.
//!
//! Generates the mail an auditor sends to a client contact to schedule the
//! engagement kickoff. Pure string formatting; nothing here talks to a mail
//! server.

use crate::entities::{Audit, Contact};
use crate::enums::Gender;

/// A generated email, ready to paste into a mail client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Draft the coordination email for `contact` about `audit`.
///
/// The salutation follows the contact's gender ("Mr."/"Ms."); when the
/// contact has no last name the full name (or email) is used instead. If a
/// meeting date is already planned the body proposes it, otherwise it asks
/// for availability.
#[must_use]
pub fn coordination_email(audit: &Audit, contact: &Contact) -> EmailDraft {
    let subject = format!(
        "Security audit coordination - {} ({})",
        audit.name, audit.client_name
    );

    let scheduling = match audit.planned_meeting_at {
        Some(at) => format!(
            "We would like to hold the kickoff meeting on {}. Please let us \
             know whether that date works on your side.",
            at.format("%B %-d, %Y")
        ),
        None => "Could you share a few dates in the coming weeks that would \
                 suit you for a kickoff meeting?"
            .to_string(),
    };

    let body = format!(
        "{salutation},\n\n\
         We have been assigned to carry out the security audit \"{name}\" \
         for {client}. To get started we need to coordinate a kickoff \
         meeting and align on scope and access.\n\n\
         {scheduling}\n\n\
         Kind regards,\n\
         {owner}",
        salutation = salutation(contact),
        name = audit.name,
        client = audit.client_name,
        owner = audit.owner_name,
    );

    EmailDraft { subject, body }
}

fn salutation(contact: &Contact) -> String {
    let last = contact.last_name.trim();
    if last.is_empty() {
        return format!("Dear {}", contact.full_name());
    }
    match contact.gender {
        Gender::Male => format!("Dear Mr. {last}"),
        Gender::Female => format!("Dear Ms. {last}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::AuditStatus;
    use crate::transitions;
    use chrono::Utc;

    fn audit() -> Audit {
        Audit {
            id: "aud-11111111".into(),
            name: "Perimeter review".into(),
            description: String::new(),
            client_name: "Acme Corp".into(),
            contacts: Vec::new(),
            received_at: Utc::now(),
            planned_meeting_at: None,
            scheduled_at: None,
            status: AuditStatus::Received,
            status_log: vec![transitions::initial_entry("Dana Levi")],
            owner_id: "dana@example.com".into(),
            owner_name: "Dana Levi".into(),
            is_archived: false,
            version: 0,
        }
    }

    fn contact(gender: Gender) -> Contact {
        Contact {
            id: "con-22222222".into(),
            first_name: "Noa".into(),
            last_name: "Barak".into(),
            role: "CISO".into(),
            email: "noa@acme.example".into(),
            phone: String::new(),
            gender,
        }
    }

    #[test]
    fn salutation_follows_gender() {
        let draft = coordination_email(&audit(), &contact(Gender::Female));
        assert!(draft.body.starts_with("Dear Ms. Barak,"));

        let draft = coordination_email(&audit(), &contact(Gender::Male));
        assert!(draft.body.starts_with("Dear Mr. Barak,"));
    }

    #[test]
    fn salutation_falls_back_to_full_name() {
        let mut c = contact(Gender::Female);
        c.last_name = String::new();
        let draft = coordination_email(&audit(), &c);
        assert!(draft.body.starts_with("Dear Noa,"));
    }

    #[test]
    fn subject_names_audit_and_client() {
        let draft = coordination_email(&audit(), &contact(Gender::Male));
        assert_eq!(
            draft.subject,
            "Security audit coordination - Perimeter review (Acme Corp)"
        );
    }

    #[test]
    fn planned_date_is_proposed_when_present() {
        let mut a = audit();
        a.planned_meeting_at = Some("2026-09-03T09:00:00Z".parse().unwrap());
        let draft = coordination_email(&a, &contact(Gender::Male));
        assert!(draft.body.contains("September 3, 2026"));

        let draft_without = coordination_email(&audit(), &contact(Gender::Male));
        assert!(draft_without.body.contains("share a few dates"));
    }

    #[test]
    fn body_signs_off_with_owner() {
        let draft = coordination_email(&audit(), &contact(Gender::Male));
        assert!(draft.body.ends_with("Dana Levi"));
    }
}
