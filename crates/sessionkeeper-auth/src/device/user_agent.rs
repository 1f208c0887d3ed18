//! Coarse user-agent classification.
//!
//! Substring matching only. The result labels a device for display; it is
//! never used for access decisions.

use sessionkeeper_entity::device::DeviceType;

/// Descriptive fields derived from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgentInfo {
    /// Operating system family.
    pub os: &'static str,
    /// Browser family.
    pub browser: &'static str,
    /// Form factor.
    pub device_type: DeviceType,
}

impl UserAgentInfo {
    /// Default display name, e.g. `"Firefox on Linux"`.
    pub fn display_name(&self) -> String {
        format!("{} on {}", self.browser, self.os)
    }
}

/// Classify a user-agent string.
pub fn parse(user_agent: &str) -> UserAgentInfo {
    let ua = user_agent.to_ascii_lowercase();
    let os = detect_os(&ua);
    UserAgentInfo {
        os,
        browser: detect_browser(&ua),
        device_type: detect_device_type(&ua, os),
    }
}

fn detect_os(ua: &str) -> &'static str {
    // iOS user-agents also say "like Mac OS X"; Android ones also say "Linux".
    if ua.contains("windows") {
        "Windows"
    } else if ua.contains("cros ") {
        "ChromeOS"
    } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
        "iOS"
    } else if ua.contains("mac os x") || ua.contains("macintosh") {
        "macOS"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("linux") {
        "Linux"
    } else {
        "Unknown"
    }
}

fn detect_browser(ua: &str) -> &'static str {
    // Order matters: Edge and Opera embed "chrome/", Chrome embeds "safari/".
    if ua.contains("edg/") || ua.contains("edge/") || ua.contains("edgios/") {
        "Edge"
    } else if ua.contains("opr/") || ua.contains("opera") {
        "Opera"
    } else if ua.contains("firefox/") || ua.contains("fxios/") {
        "Firefox"
    } else if ua.contains("chrome/") || ua.contains("crios/") || ua.contains("chromium/") {
        "Chrome"
    } else if ua.contains("safari/") {
        "Safari"
    } else {
        "Unknown"
    }
}

fn detect_device_type(ua: &str, os: &str) -> DeviceType {
    const BOT_MARKERS: [&str; 5] = ["bot", "crawler", "spider", "curl/", "wget/"];

    if BOT_MARKERS.iter().any(|m| ua.contains(m)) {
        DeviceType::Bot
    } else if ua.contains("ipad")
        || ua.contains("tablet")
        || (ua.contains("android") && !ua.contains("mobile"))
    {
        DeviceType::Tablet
    } else if ua.contains("mobi") || ua.contains("iphone") || ua.contains("ipod") {
        DeviceType::Mobile
    } else if matches!(os, "Windows" | "macOS" | "Linux" | "ChromeOS") {
        DeviceType::Desktop
    } else {
        DeviceType::Unknown
    }
}
