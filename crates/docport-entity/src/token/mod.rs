//! Access token entities.

pub mod model;

pub use model::AccessToken;
