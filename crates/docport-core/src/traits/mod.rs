//! Collaborator traits implemented outside this crate.

pub mod captcha;
pub mod notifier;

pub use captcha::CaptchaVerifier;
pub use notifier::Notifier;
