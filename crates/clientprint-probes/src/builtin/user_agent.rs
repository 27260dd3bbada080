//! User-agent probe.
//!
//! Best-effort parse of the raw UA string into browser, OS, platform type and
//! rendering engine. Parts that no rule recognizes are empty strings; the raw
//! string is always carried verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use clientprint_core::model::{Category, UserAgentSignal};

use crate::host::Host;
use crate::spec::ProbeSpec;

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.user_agent", Category::UserAgent, "User agent", "0.1.0")
        .meta("source", "navigator.userAgent")
}

pub fn probe_user_agent(host: &dyn Host) -> UserAgentSignal {
    parse_user_agent(&host.user_agent())
}

/// A named rule. Capture group 1, when present, is the version.
type Rule = (&'static str, Regex);

fn compile(rules: &[(&'static str, &str)]) -> Vec<Rule> {
    rules
        .iter()
        .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|re| (*name, re)))
        .collect()
}

// First match wins, so wrappers around Chromium come before Chrome and
// Chrome comes before Safari.
static BROWSERS: Lazy<Vec<Rule>> = Lazy::new(|| {
    compile(&[
        ("Microsoft Edge", r"(?:Edg|Edge|EdgA|EdgiOS)/([\d.]+)"),
        ("Opera", r"(?:OPR|OPiOS)/([\d.]+)"),
        ("Opera", r"Opera/.*Version/([\d.]+)"),
        ("Samsung Internet for Android", r"SamsungBrowser/([\d.]+)"),
        ("Yandex Browser", r"YaBrowser/([\d.]+)"),
        ("Vivaldi", r"Vivaldi/([\d.]+)"),
        ("Internet Explorer", r"MSIE ([\d.]+)"),
        ("Internet Explorer", r"Trident/.*rv:([\d.]+)"),
        ("Firefox", r"(?:Firefox|FxiOS)/([\d.]+)"),
        ("Chromium", r"Chromium/([\d.]+)"),
        ("Chrome", r"(?:Chrome|CriOS)/([\d.]+)"),
        ("Safari", r"Version/([\d.]+).*Safari/"),
        ("Safari", r"Safari/"),
    ])
});

static SYSTEMS: Lazy<Vec<Rule>> = Lazy::new(|| {
    compile(&[
        ("Windows Phone", r"Windows Phone(?: OS)? ([\d.]+)"),
        ("Windows", r"Windows NT ([\d.]+)"),
        ("iOS", r"(?:iPhone|iPad|iPod).*? OS ([\d_]+)"),
        ("Android", r"Android ([\d.]+)"),
        ("Chrome OS", r"CrOS \S+ ([\d.]+)"),
        ("macOS", r"Mac OS X ([\d_.]+)"),
        ("Linux", r"Linux"),
    ])
});

static ENGINES: Lazy<Vec<Rule>> = Lazy::new(|| {
    compile(&[
        ("Trident", r"Trident/"),
        ("EdgeHTML", r"Edge/\d"),
        ("Presto", r"Presto/"),
        ("Gecko", r"Gecko/\d.*Firefox/"),
        ("Blink", r"AppleWebKit/.*(?:Chrome|Chromium)/"),
        ("WebKit", r"AppleWebKit/"),
    ])
});

static BOT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)bot|crawler|spider|crawling").ok());

fn first_match(rules: &[Rule], raw: &str) -> Option<(&'static str, String)> {
    rules.iter().find_map(|(name, re)| {
        re.captures(raw).map(|caps| {
            let version = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            (*name, version)
        })
    })
}

fn platform_type(raw: &str, os: &str) -> &'static str {
    if BOT.as_ref().is_some_and(|re| re.is_match(raw)) {
        return "bot";
    }
    if raw.contains("iPad") || raw.contains("Tablet") || (os == "Android" && !raw.contains("Mobile")) {
        return "tablet";
    }
    if raw.contains("Mobi") || raw.contains("iPhone") || raw.contains("iPod") || os == "Windows Phone" {
        return "mobile";
    }
    if raw.contains("SmartTV") || raw.contains("SMART-TV") || raw.contains("TV Safari") {
        return "tv";
    }
    if os.is_empty() {
        ""
    } else {
        "desktop"
    }
}

/// Parse a raw UA string.
pub fn parse_user_agent(raw: &str) -> UserAgentSignal {
    let (browser, version) = first_match(&BROWSERS, raw).unwrap_or_default();
    let (os, os_version) = first_match(&SYSTEMS, raw).unwrap_or_default();

    // Every iOS browser renders with WebKit.
    let engine = if os == "iOS" && raw.contains("AppleWebKit/") {
        "WebKit"
    } else {
        first_match(&ENGINES, raw).map(|(e, _)| e).unwrap_or_default()
    };

    UserAgentSignal {
        browser: browser.to_string(),
        version,
        os: os.to_string(),
        os_version: os_version.replace('_', "."),
        platform: platform_type(raw, os).to_string(),
        engine: engine.to_string(),
        raw: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const EDGE_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.2592.87";
    const FIREFOX_LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15";
    const CHROME_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/126.0.6478.54 Mobile/15E148 Safari/604.1";
    const CHROME_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";

    #[test]
    fn chrome_on_windows() {
        let ua = parse_user_agent(CHROME_WIN);
        assert_eq!(ua.browser, "Chrome");
        assert_eq!(ua.version, "126.0.0.0");
        assert_eq!(ua.os, "Windows");
        assert_eq!(ua.os_version, "10.0");
        assert_eq!(ua.platform, "desktop");
        assert_eq!(ua.engine, "Blink");
        assert_eq!(ua.raw, CHROME_WIN);
    }

    #[test]
    fn edge_wins_over_chrome() {
        let ua = parse_user_agent(EDGE_WIN);
        assert_eq!(ua.browser, "Microsoft Edge");
        assert_eq!(ua.version, "126.0.2592.87");
        assert_eq!(ua.engine, "Blink");
    }

    #[test]
    fn firefox_on_linux() {
        let ua = parse_user_agent(FIREFOX_LINUX);
        assert_eq!(ua.browser, "Firefox");
        assert_eq!(ua.version, "128.0");
        assert_eq!(ua.os, "Linux");
        assert_eq!(ua.os_version, "");
        assert_eq!(ua.engine, "Gecko");
    }

    #[test]
    fn safari_on_macos() {
        let ua = parse_user_agent(SAFARI_MAC);
        assert_eq!(ua.browser, "Safari");
        assert_eq!(ua.version, "17.5");
        assert_eq!(ua.os, "macOS");
        assert_eq!(ua.os_version, "10.15.7");
        assert_eq!(ua.engine, "WebKit");
    }

    #[test]
    fn ios_browsers_use_webkit() {
        let ua = parse_user_agent(CHROME_IPHONE);
        assert_eq!(ua.browser, "Chrome");
        assert_eq!(ua.os, "iOS");
        assert_eq!(ua.os_version, "17.5");
        assert_eq!(ua.platform, "mobile");
        assert_eq!(ua.engine, "WebKit");
    }

    #[test]
    fn android_phone_is_mobile() {
        let ua = parse_user_agent(CHROME_ANDROID);
        assert_eq!(ua.os, "Android");
        assert_eq!(ua.os_version, "14");
        assert_eq!(ua.platform, "mobile");
    }

    #[test]
    fn unknown_parts_are_empty() {
        let ua = parse_user_agent("curl/8.5.0");
        assert_eq!(ua.browser, "");
        assert_eq!(ua.version, "");
        assert_eq!(ua.os, "");
        assert_eq!(ua.platform, "");
        assert_eq!(ua.engine, "");
        assert_eq!(ua.raw, "curl/8.5.0");

        let empty = parse_user_agent("");
        assert_eq!(empty, UserAgentSignal::default());
    }
}
