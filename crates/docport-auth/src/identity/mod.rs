//! Visitor identity derivation.
//!
//! Identities are one-way hashes so repeat visits collapse to a single
//! visitor without storing raw IP addresses or emails.

pub mod device;
pub mod fingerprint;
pub mod geo;

pub use device::classify_device;
pub use fingerprint::{anonymous_visitor_id, email_visitor_id};
pub use geo::country_from_header;
