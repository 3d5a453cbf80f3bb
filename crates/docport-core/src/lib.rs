//! # docport-core
//!
//! Core crate for the DocPort link access gateway. Contains configuration
//! schemas, domain events, collaborator traits, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other DocPort crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
