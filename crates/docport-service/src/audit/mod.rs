//! Append-only audit logging.

pub mod logger;

pub use logger::AuditLogger;
