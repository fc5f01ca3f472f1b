//! # scrutiny-core
//!
//! Core types and rules for Scrutiny, the security-audit engagement tracker.
//!
//! This crate provides the foundational pieces shared across all Scrutiny
//! crates:
//! - Entity structs for the domain objects (audits, contacts, status changes,
//!   users, system audit-log entries)
//! - Status and role enums with the transition authorization rules
//! - Permission predicates evaluated before every mutation
//! - Status-log entry construction and the archive-membership rule
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types
//! - Coordination email drafting

pub mod email;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod permissions;
pub mod transitions;
