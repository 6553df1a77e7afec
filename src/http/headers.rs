// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header sets sent to the portals

use std::collections::HashMap;

use url::Url;

/// Explicit headers of a request, by name
pub type HeaderSet = HashMap<String, String>;

/// Desktop Firefox, the browser the portals are tested against
pub const FIREFOX_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Desktop Chrome alternative
pub const CHROME_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = FIREFOX_USER_AGENT;

/// Header names
pub mod names {
    pub const ACCEPT: &str = "Accept";
    pub const ACCEPT_LANGUAGE: &str = "Accept-Language";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const HOST: &str = "Host";
    pub const PRAGMA: &str = "Pragma";
    pub const REFERER: &str = "Referer";
    pub const USER_AGENT: &str = "User-Agent";
    pub const X_REQUESTED_WITH: &str = "X-Requested-With";
}

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_ES: &str = "es,en-US;q=0.9,en;q=0.8";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Builds the header sets for GET, form POST and AJAX POST requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    user_agent: String,
}

impl Default for Headers {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

impl Headers {
    /// Create a header builder using the given user agent
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    /// User agent sent on every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers of a page navigation, `Referer` only when non-empty
    pub fn get(&self, referer: &str) -> HeaderSet {
        let mut headers = HeaderSet::new();
        headers.insert(names::ACCEPT.into(), ACCEPT_HTML.into());
        headers.insert(names::ACCEPT_LANGUAGE.into(), ACCEPT_LANGUAGE_ES.into());
        headers.insert(names::USER_AGENT.into(), self.user_agent.clone());
        if !referer.is_empty() {
            headers.insert(names::REFERER.into(), referer.into());
        }
        headers
    }

    /// Headers of a form submission, `Host` only when non-empty
    pub fn post(&self, host: &str, referer: &str) -> HeaderSet {
        let mut headers = self.get(referer);
        headers.insert(names::PRAGMA.into(), "no-cache".into());
        headers.insert(names::CONTENT_TYPE.into(), FORM_CONTENT_TYPE.into());
        if !host.is_empty() {
            headers.insert(names::HOST.into(), host.into());
        }
        headers
    }

    /// Headers of an XMLHttpRequest form submission
    pub fn post_ajax(&self, host: &str, referer: &str) -> HeaderSet {
        let mut headers = self.post(host, referer);
        headers.insert(names::X_REQUESTED_WITH.into(), "XMLHttpRequest".into());
        headers
    }
}

/// Value of the `Host` header for a URL: host plus port when it is not the scheme default.
/// Empty when the URL cannot be parsed.
pub fn host_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let host = parsed.host_str().unwrap_or_default();
    match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_headers() {
        let headers = Headers::default().get("");
        assert_eq!(headers.get(names::USER_AGENT).map(String::as_str), Some(FIREFOX_USER_AGENT));
        assert_eq!(headers.get(names::ACCEPT).map(String::as_str), Some(ACCEPT_HTML));
        assert!(!headers.contains_key(names::REFERER));
        assert!(!headers.contains_key(names::CONTENT_TYPE));

        let headers = Headers::default().get("https://example.com/");
        assert_eq!(
            headers.get(names::REFERER).map(String::as_str),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_post_headers() {
        let headers = Headers::new("agent/1.0").post("cfdiau.sat.gob.mx", "https://cfdiau.sat.gob.mx/");
        assert_eq!(headers.get(names::USER_AGENT).map(String::as_str), Some("agent/1.0"));
        assert_eq!(headers.get(names::HOST).map(String::as_str), Some("cfdiau.sat.gob.mx"));
        assert_eq!(headers.get(names::PRAGMA).map(String::as_str), Some("no-cache"));
        assert_eq!(
            headers.get(names::CONTENT_TYPE).map(String::as_str),
            Some(FORM_CONTENT_TYPE)
        );
        assert!(!headers.contains_key(names::X_REQUESTED_WITH));

        let headers = Headers::default().post("", "");
        assert!(!headers.contains_key(names::HOST));
        assert!(!headers.contains_key(names::REFERER));
    }

    #[test]
    fn test_ajax_headers() {
        let headers = Headers::default().post_ajax("example.com", "https://example.com/");
        assert_eq!(
            headers.get(names::X_REQUESTED_WITH).map(String::as_str),
            Some("XMLHttpRequest")
        );
        assert!(headers.contains_key(names::CONTENT_TYPE));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://cfdiau.sat.gob.mx/nidp/app/login?id=1"), "cfdiau.sat.gob.mx");
        assert_eq!(host_of("http://127.0.0.1:8080/login"), "127.0.0.1:8080");
        assert_eq!(host_of("https://example.com:443/"), "example.com");
        assert_eq!(host_of("not a url"), "");
    }
}
