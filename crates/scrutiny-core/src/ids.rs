//! Prefixed ID generation.
//!
//! Every entity carries an opaque `{prefix}-{8 hex}` identifier, e.g.
//! `aud-a3f8b2c1`. The hex comes from the OS RNG; both backends treat the
//! string as opaque.

/// Audit engagement records.
pub const PREFIX_AUDIT: &str = "aud";
/// Status-log entries.
pub const PREFIX_CHANGE: &str = "chg";
/// Contacts.
pub const PREFIX_CONTACT: &str = "con";
/// Users.
pub const PREFIX_USER: &str = "usr";
/// System audit-log entries.
pub const PREFIX_LOG: &str = "log";

/// Generate a prefixed ID, e.g. `"aud-a3f8b2c1"`.
///
/// Falls back to timestamp-derived bytes in the unlikely case the OS RNG is
/// unavailable, so callers never have to thread an error for ID creation.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let mut bytes = [0u8; 4];
    if getrandom::fill(&mut bytes).is_err() {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes();
        bytes.copy_from_slice(&nanos[..4]);
    }
    format!(
        "{prefix}-{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_prefix_dash_8_hex() {
        let id = generate_id(PREFIX_AUDIT);
        let (prefix, hex) = id.split_once('-').unwrap();
        assert_eq!(prefix, "aud");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_are_unique_enough() {
        let a = generate_id(PREFIX_CHANGE);
        let b = generate_id(PREFIX_CHANGE);
        assert_ne!(a, b);
    }
}
