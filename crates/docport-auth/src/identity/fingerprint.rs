//! One-way visitor fingerprints.

use sha2::{Digest, Sha256};

/// Hex length of derived fingerprints.
const FINGERPRINT_LEN: usize = 32;

/// Derives a stable anonymous visitor id from request context.
///
/// Repeat visits from the same browser and network collapse to one id;
/// the raw IP and user agent are never stored.
pub fn anonymous_visitor_id(ip: &str, user_agent: &str) -> String {
    fingerprint(&format!("{ip}\n{user_agent}"))
}

/// Derives a visitor id from an email address.
///
/// Returning by email from a different device still counts as the same
/// unique visitor.
pub fn email_visitor_id(email: &str) -> String {
    fingerprint(&email.trim().to_lowercase())
}

fn fingerprint(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(FINGERPRINT_LEN);
    for byte in digest.iter().take(FINGERPRINT_LEN / 2) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_id_is_stable_and_fixed_length() {
        let a = anonymous_visitor_id("203.0.113.7", "Mozilla/5.0");
        let b = anonymous_visitor_id("203.0.113.7", "Mozilla/5.0");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn different_context_gives_different_id() {
        let a = anonymous_visitor_id("203.0.113.7", "Mozilla/5.0");
        let b = anonymous_visitor_id("203.0.113.8", "Mozilla/5.0");
        assert_ne!(a, b);
    }

    #[test]
    fn email_id_normalizes_case_and_whitespace() {
        assert_eq!(
            email_visitor_id("Alice@Example.com "),
            email_visitor_id("alice@example.com")
        );
    }

    #[test]
    fn email_id_differs_from_anonymous_id() {
        assert_ne!(
            email_visitor_id("alice@example.com"),
            anonymous_visitor_id("alice@example.com", "")
        );
    }
}
