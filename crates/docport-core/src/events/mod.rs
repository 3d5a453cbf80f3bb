//! Domain events emitted by the gateway.

pub mod access;

pub use access::AccessEvent;
