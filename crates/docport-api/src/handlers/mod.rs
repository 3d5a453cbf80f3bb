//! HTTP request handlers.

pub mod access;
pub mod engagement;
pub mod health;
