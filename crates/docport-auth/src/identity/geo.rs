//! Country resolution from the trusted geo header.

/// Country used when the edge proxy supplied no geo header.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Reads the country code from the trusted geo header value.
///
/// Absent or blank values yield [`UNKNOWN_COUNTRY`].
pub fn country_from_header(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(code) => code.to_uppercase(),
        None => UNKNOWN_COUNTRY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_present_header() {
        assert_eq!(country_from_header(Some("de")), "DE");
        assert_eq!(country_from_header(Some(" us ")), "US");
    }

    #[test]
    fn absent_or_blank_is_unknown() {
        assert_eq!(country_from_header(None), "unknown");
        assert_eq!(country_from_header(Some("  ")), "unknown");
    }
}
