//! Argument parsing helpers shared by the command handlers.

use anyhow::{Context as _, bail};
use chrono::{DateTime, Utc};

use scrutiny_core::entities::Contact;
use scrutiny_core::enums::{AuditStatus, Gender, Role};

/// Parse an exact status value (`"InWriting"`, `"UnderReview"`, ...).
pub fn status(s: &str) -> anyhow::Result<AuditStatus> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).with_context(|| {
        let all: Vec<&str> = AuditStatus::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown status '{s}' (expected one of: {})", all.join(", "))
    })
}

/// Parse a roster role (`auditor`, `manager`, `system_admin`).
pub fn role(s: &str) -> anyhow::Result<Role> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .with_context(|| format!("unknown role '{s}' (expected auditor, manager or system_admin)"))
}

/// Parse a contact argument: `"First Last <email>"`, optionally prefixed
/// with `mr:` or `ms:` to set the salutation gender. The id is left empty;
/// the aggregate manager assigns one.
pub fn contact(s: &str) -> anyhow::Result<Contact> {
    let (gender, rest) = match s.split_once(':') {
        Some(("mr", rest)) => (Gender::Male, rest),
        Some(("ms", rest)) => (Gender::Female, rest),
        _ => (Gender::Male, s),
    };

    let (names, email) = match (rest.find('<'), rest.rfind('>')) {
        (Some(open), Some(close)) if open < close => (
            rest[..open].trim(),
            rest[open + 1..close].trim().to_string(),
        ),
        _ => (rest.trim(), String::new()),
    };

    let mut parts = names.split_whitespace();
    let first_name = parts.next().unwrap_or_default().to_string();
    let last_name = parts.collect::<Vec<_>>().join(" ");

    if first_name.is_empty() && email.is_empty() {
        bail!("contact '{s}' needs at least a first name or an <email>");
    }

    Ok(Contact {
        id: String::new(),
        first_name,
        last_name,
        role: String::new(),
        email,
        phone: String::new(),
        gender,
    })
}

/// Parse a meeting argument: an RFC 3339 timestamp, or `clear` for "no
/// meeting planned".
pub fn meeting(s: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
    if s.eq_ignore_ascii_case("clear") {
        return Ok(None);
    }
    let at = s
        .parse::<DateTime<Utc>>()
        .with_context(|| format!("'{s}' is not an RFC 3339 timestamp (or 'clear')"))?;
    Ok(Some(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_accepts_exact_values_only() {
        assert_eq!(status("InWriting").unwrap(), AuditStatus::InWriting);
        assert!(status("in_writing").is_err());
        assert!(status("Written").is_err());
    }

    #[test]
    fn contact_parses_name_email_and_gender() {
        let c = contact("ms:Noa Barak <noa@acme.example>").unwrap();
        assert_eq!(c.first_name, "Noa");
        assert_eq!(c.last_name, "Barak");
        assert_eq!(c.email, "noa@acme.example");
        assert_eq!(c.gender, Gender::Female);

        let c = contact("Gil").unwrap();
        assert_eq!(c.first_name, "Gil");
        assert_eq!(c.gender, Gender::Male);
        assert!(c.email.is_empty());

        let c = contact("<ciso@acme.example>").unwrap();
        assert!(c.first_name.is_empty());
        assert_eq!(c.email, "ciso@acme.example");
    }

    #[test]
    fn contact_rejects_empty_input() {
        assert!(contact("  ").is_err());
        assert!(contact("mr:").is_err());
    }

    #[test]
    fn meeting_parses_rfc3339_and_clear() {
        assert_eq!(meeting("clear").unwrap(), None);
        assert!(meeting("2026-09-01T09:00:00Z").unwrap().is_some());
        assert!(meeting("next tuesday").is_err());
    }
}
