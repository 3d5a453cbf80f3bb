//! Visitor identity value objects.

pub mod model;

pub use model::{DeviceClass, Visit};
