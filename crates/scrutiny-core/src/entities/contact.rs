use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Gender;

/// A person associated with an audit on the client side.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Free-text title, e.g. "CISO" or "IT manager".
    pub role: String,
    pub email: String,
    pub phone: String,
    /// Used only to pick the salutation in generated email text.
    pub gender: Gender,
}

impl Contact {
    /// Display name: `"first last"` trimmed, falling back to the email
    /// address when both name parts are blank.
    #[must_use]
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    /// A contact must carry a non-blank first name or email at creation time.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.first_name.trim().is_empty() || !self.email.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contact(first: &str, last: &str, email: &str) -> Contact {
        Contact {
            id: "con-00000000".into(),
            first_name: first.into(),
            last_name: last.into(),
            role: String::new(),
            email: email.into(),
            phone: String::new(),
            gender: Gender::Male,
        }
    }

    #[test]
    fn full_name_joins_and_trims() {
        assert_eq!(contact("Noa", "Barak", "").full_name(), "Noa Barak");
        assert_eq!(contact("Noa", "", "").full_name(), "Noa");
        assert_eq!(contact("", " Barak ", "").full_name(), "Barak");
    }

    #[test]
    fn full_name_falls_back_to_email() {
        assert_eq!(
            contact("", "", "noa@acme.example").full_name(),
            "noa@acme.example"
        );
    }

    #[test]
    fn validity_requires_name_or_email() {
        assert!(contact("Noa", "", "").is_valid());
        assert!(contact("", "", "noa@acme.example").is_valid());
        assert!(!contact("  ", "", "  ").is_valid());
        assert!(!contact("", "Barak", "").is_valid());
    }
}
