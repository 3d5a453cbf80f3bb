//! Document reference entities.

pub mod model;

pub use model::DocumentRef;
