//! Device classification from user-agent substrings.

use docport_entity::visitor::DeviceClass;

/// Tablet patterns checked before the generic mobile patterns.
const TABLET_PATTERNS: [&str; 4] = ["ipad", "tablet", "kindle", "silk"];

/// Generic mobile patterns.
const MOBILE_PATTERNS: [&str; 4] = ["mobi", "iphone", "ipod", "android"];

/// Classifies a user agent into exactly one device class.
///
/// Tablet patterns take precedence: an Android tablet reports `android`
/// without `mobile`, so Android UAs lacking a mobile marker classify as
/// tablets.
pub fn classify_device(user_agent: &str) -> DeviceClass {
    let ua = user_agent.to_lowercase();

    if TABLET_PATTERNS.iter().any(|p| ua.contains(p)) {
        return DeviceClass::Tablet;
    }
    if ua.contains("android") && !ua.contains("mobile") {
        return DeviceClass::Tablet;
    }
    if MOBILE_PATTERNS.iter().any(|p| ua.contains(p)) {
        return DeviceClass::Mobile;
    }
    DeviceClass::Desktop
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iphone_is_mobile() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
        assert_eq!(classify_device(ua), DeviceClass::Mobile);
    }

    #[test]
    fn ipad_is_tablet_not_mobile() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) Mobile/15E148";
        assert_eq!(classify_device(ua), DeviceClass::Tablet);
    }

    #[test]
    fn android_phone_is_mobile() {
        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36";
        assert_eq!(classify_device(ua), DeviceClass::Mobile);
    }

    #[test]
    fn android_tablet_is_tablet() {
        let ua = "Mozilla/5.0 (Linux; Android 13; SM-X710) Safari/537.36";
        assert_eq!(classify_device(ua), DeviceClass::Tablet);
    }

    #[test]
    fn desktop_is_default() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0";
        assert_eq!(classify_device(ua), DeviceClass::Desktop);
        assert_eq!(classify_device(""), DeviceClass::Desktop);
    }
}
