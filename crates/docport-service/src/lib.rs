//! # docport-service
//!
//! Business logic service layer for DocPort. Each service orchestrates
//! the link store, gate chain, identity derivation, token issuance, and
//! notifications to implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time.

pub mod access;
pub mod audit;
pub mod context;
pub mod engagement;
pub mod notify;

pub use access::{AccessEvaluation, AccessService, GrantedAccess};
pub use audit::AuditLogger;
pub use context::RequestContext;
pub use engagement::{EngagementInput, EngagementService};
pub use notify::{NoopNotifier, NotificationDispatcher, WebhookNotifier};
