//! PostgreSQL link store backend.

pub mod connection;
pub mod rows;
pub mod schema;
pub mod store;

pub use store::PostgresLinkStore;
