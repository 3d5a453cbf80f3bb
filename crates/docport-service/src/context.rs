//! Request context carrying the resolved caller metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docport_auth::identity::device::classify_device;
use docport_auth::identity::fingerprint::{anonymous_visitor_id, email_visitor_id};
use docport_auth::identity::geo::country_from_header;
use docport_entity::visitor::{DeviceClass, Visit};

/// Context for the current link access request.
///
/// Extracted by the HTTP layer and passed into service methods. Visitors
/// are never authenticated users here; identity is derived, not asserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Client IP address ("unknown" when it could not be resolved).
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Referer header value.
    pub referrer: Option<String>,
    /// Raw value of the trusted geo header, if present.
    pub geo_country: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        ip_address: String,
        user_agent: Option<String>,
        referrer: Option<String>,
        geo_country: Option<String>,
    ) -> Self {
        Self {
            ip_address,
            user_agent,
            referrer,
            geo_country,
            request_time: Utc::now(),
        }
    }

    /// Derives the visitor id: the email hash when a granted email is
    /// available, otherwise the anonymous network/browser fingerprint.
    pub fn visitor_id(&self, email: Option<&str>) -> String {
        match email {
            Some(email) => email_visitor_id(email),
            None => anonymous_visitor_id(&self.ip_address, self.user_agent.as_deref().unwrap_or("")),
        }
    }

    /// Classifies the requesting device from the user agent.
    pub fn device(&self) -> DeviceClass {
        classify_device(self.user_agent.as_deref().unwrap_or(""))
    }

    /// Resolves the country code from the trusted geo header.
    pub fn country(&self) -> String {
        country_from_header(self.geo_country.as_deref())
    }

    /// Builds the analytics merge payload for a grant.
    pub fn visit(&self, email: Option<&str>) -> Visit {
        Visit {
            visitor_id: self.visitor_id(email),
            country: self.country(),
            device: self.device(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new(
            "203.0.113.7".into(),
            Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile".into()),
            None,
            Some("de".into()),
        )
    }

    #[test]
    fn visit_combines_identity_device_and_country() {
        let visit = ctx().visit(None);
        assert_eq!(visit.visitor_id.len(), 32);
        assert_eq!(visit.device, DeviceClass::Mobile);
        assert_eq!(visit.country, "DE");
    }

    #[test]
    fn email_identity_overrides_fingerprint() {
        let c = ctx();
        assert_eq!(c.visit(Some("a@x.com")).visitor_id, c.visitor_id(Some("a@x.com")));
        assert_ne!(c.visit(Some("a@x.com")).visitor_id, c.visitor_id(None));
    }
}
