//! Extracts the request metadata used for visitor identity derivation.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use docport_service::RequestContext;

use crate::state::AppState;

/// Fallback when no client address can be resolved.
const UNKNOWN_IP: &str = "unknown";

/// Raw caller metadata pulled from request headers.
///
/// The client IP prefers the first hop of `x-forwarded-for` (the gateway
/// sits behind an edge proxy), falling back to the socket peer address.
/// The geo header name comes from configuration since it depends on the
/// edge provider.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Resolved client IP.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Referer header value.
    pub referrer: Option<String>,
    /// Raw value of the trusted geo header.
    pub geo_country: Option<String>,
}

impl RequestMeta {
    /// Converts into the service-layer request context.
    pub fn into_context(self) -> RequestContext {
        RequestContext::new(
            self.ip_address,
            self.user_agent,
            self.referrer,
            self.geo_country,
        )
    }
}

impl FromRequestParts<AppState> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        let ip_address = forwarded_ip(headers)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            })
            .unwrap_or_else(|| UNKNOWN_IP.to_string());

        Ok(Self {
            ip_address,
            user_agent: header_value(headers, "user-agent"),
            referrer: header_value(headers, "referer"),
            geo_country: header_value(headers, &state.config.server.geo_header),
        })
    }
}

/// First hop of `x-forwarded-for`, if present and non-empty.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let raw = header_value(headers, "x-forwarded-for")?;
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn forwarded_ip_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn absent_forwarded_header_is_none() {
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }
}
