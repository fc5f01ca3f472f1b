//! Row-to-entity parsing helpers for the remote adapter.
//!
//! Every query needs to convert `libsql::Row` (column-indexed) into typed
//! entity structs. These helpers isolate the parsing and handle the dual
//! datetime format issue (`SQLite`'s `datetime('now')` vs Rust's
//! `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-08-07T14:30:00+00:00"`) and `SQLite`'s
/// default format (`"2026-08-07 14:30:00"`).
///
/// # Errors
///
/// Returns `StoreError::Query` if the string parses as neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `StoreError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works for every scrutiny-core enum, whatever its rename policy, because
/// it goes through the enum's own serde representation.
///
/// # Errors
///
/// Returns `StoreError::Query` if the string matches no variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| StoreError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Parse a nullable TEXT column into an optional enum.
///
/// # Errors
///
/// Returns `StoreError::Query` if a non-empty string matches no variant.
pub fn parse_optional_enum<T: serde::de::DeserializeOwned>(
    s: Option<&str>,
) -> Result<Option<T>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_enum(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty
/// string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`;
/// nullable columns must go through `get::<Option<String>>()`.
///
/// # Errors
///
/// Returns `StoreError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, StoreError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrutiny_core::enums::{AuditStatus, Gender};

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2026-08-07T14:30:00+00:00").unwrap();
        let sqlite = parse_datetime("2026-08-07 14:30:00").unwrap();
        assert_eq!(rfc, sqlite);
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(parse_datetime("next Tuesday").is_err());
    }

    #[test]
    fn optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert!(parse_optional_datetime(Some("2026-08-07 14:30:00"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn enum_parsing_respects_each_rename_policy() {
        let status: AuditStatus = parse_enum("CoordinationEmailSentToAdmin").unwrap();
        assert_eq!(status, AuditStatus::CoordinationEmailSentToAdmin);

        let gender: Gender = parse_enum("female").unwrap();
        assert_eq!(gender, Gender::Female);

        assert!(parse_enum::<AuditStatus>("coordination_email_sent_to_admin").is_err());
    }

    #[test]
    fn optional_enum_handles_null() {
        let none: Option<AuditStatus> = parse_optional_enum(None).unwrap();
        assert_eq!(none, None);
        let some: Option<AuditStatus> = parse_optional_enum(Some("InWriting")).unwrap();
        assert_eq!(some, Some(AuditStatus::InWriting));
    }
}
