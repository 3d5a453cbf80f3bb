//! Visitor identity and device classification value objects.

use serde::{Deserialize, Serialize};

/// Device class derived from user-agent matching.
///
/// Exactly one class per request; tablet patterns take precedence over
/// generic mobile patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Phone-class devices.
    Mobile,
    /// Tablet-class devices.
    Tablet,
    /// Everything else.
    Desktop,
}

impl DeviceClass {
    /// The stable string form used as an analytics map key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The per-grant analytics merge payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    /// Derived visitor fingerprint (anonymous or email-based).
    pub visitor_id: String,
    /// Country code, `"unknown"` when the geo header was absent.
    pub country: String,
    /// Classified device.
    pub device: DeviceClass,
}
