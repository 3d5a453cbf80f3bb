//! Fire-and-forget access notifications.

pub mod dispatcher;
pub mod webhook;

pub use dispatcher::{NoopNotifier, NotificationDispatcher};
pub use webhook::WebhookNotifier;
