//! # docport-entity
//!
//! Domain entity models for DocPort. Every struct in this crate represents
//! a stored record or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, and `Deserialize`; storage concerns live in
//! `docport-store`.

pub mod audit;
pub mod document;
pub mod link;
pub mod token;
pub mod visitor;
