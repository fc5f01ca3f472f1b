//! Entity structs for all Scrutiny domain objects.

mod audit;
mod audit_log;
mod contact;
mod status_change;
mod user;

pub use audit::Audit;
pub use audit_log::AuditLogEntry;
pub use contact::Contact;
pub use status_change::StatusChange;
pub use user::User;
