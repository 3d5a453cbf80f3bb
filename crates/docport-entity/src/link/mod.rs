//! Share link domain entities.

pub mod analytics;
pub mod model;

pub use analytics::LinkAnalytics;
pub use model::{LinkPermissions, ShareLink};
