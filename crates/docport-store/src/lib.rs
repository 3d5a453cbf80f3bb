//! # docport-store
//!
//! The Link Store adapter. Correctness of the gateway's quota and
//! analytics invariants comes from this crate's atomic primitives, not
//! from in-process locking in the request handlers: every mutating
//! operation is a single conditional update against the backend.

pub mod memory;
pub mod postgres;
pub mod store;

pub use store::{LinkStore, StoreManager, ViewOutcome};
