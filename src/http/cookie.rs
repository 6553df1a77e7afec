// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar shared between the gateway and its callers
//!
//! The jar is installed as reqwest's cookie provider, so cookies set on the
//! intermediate responses of a redirect chain are kept and sent on the next hop.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use dashmap::DashMap;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Upper bound applied to Max-Age (400 days)
const MAX_AGE_CAP_SECS: i64 = 400 * 24 * 60 * 60;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Domain the cookie belongs to, without leading dot
    pub domain: String,
    /// Only sent to exactly `domain` (no `Domain` attribute was given)
    #[serde(default)]
    pub host_only: bool,
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    /// Create a new cookie valid for every path
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            host_only: false,
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into().trim_start_matches('.').to_lowercase();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp <= Utc::now())
    }

    /// Check if the cookie must be sent to the given URL
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("").to_lowercase();
        if !self.domain_matches(&host) {
            return false;
        }

        if !path_matches(&self.path, url.path()) {
            return false;
        }

        if self.secure && url.scheme() != "https" {
            return false;
        }

        !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }
        if self.host_only {
            return host == self.domain;
        }
        host == self.domain || host.ends_with(&format!(".{}", self.domain))
    }

    /// Parse a Set-Cookie header value received from `url`
    pub fn parse(header: &str, url: &Url) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let host = url.host_str().unwrap_or("").to_lowercase();
        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));
        cookie.domain = host.clone();
        cookie.host_only = true;
        cookie.path = default_path(url);

        let mut max_age: Option<i64> = None;
        for part in parts {
            let part = part.trim();
            match part.split_once('=') {
                Some((attr, val)) => {
                    let val = val.trim();
                    match attr.trim().to_lowercase().as_str() {
                        "domain" if !val.is_empty() => {
                            let domain = val.trim_start_matches('.').to_lowercase();
                            // Only the request host or one of its parents
                            if host != domain && !host.ends_with(&format!(".{}", domain)) {
                                return None;
                            }
                            cookie.domain = domain;
                            cookie.host_only = false;
                        }
                        "path" if val.starts_with('/') => cookie.path = val.to_string(),
                        "expires" => {
                            if let Some(dt) = parse_cookie_date(val) {
                                cookie.expires = Some(dt);
                            }
                        }
                        "max-age" => max_age = val.parse::<i64>().ok(),
                        _ => {}
                    }
                }
                None => match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                },
            }
        }

        // Max-Age wins over Expires; zero or negative removes the cookie
        if let Some(secs) = max_age {
            let secs = secs.clamp(-1, MAX_AGE_CAP_SECS);
            cookie.expires = Some(Utc::now() + chrono::Duration::seconds(secs));
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Directory of the request path, used when the cookie has no Path attribute
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path == request_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // Netscape style: Wed, 21-Oct-2015 07:28:00 GMT
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%a, %d-%b-%y %H:%M:%S GMT"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Thread-safe cookie storage, cloning shares the same cookies
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// Cookies stored by domain
    cookies: Arc<DashMap<String, Vec<Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, replacing one with the same name, domain and path.
    /// An already expired cookie only removes its previous value.
    pub fn add(&self, cookie: Cookie) {
        let mut entry = self.cookies.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        if !cookie.is_expired() {
            entry.push(cookie);
        }
    }

    /// Add a cookie from a Set-Cookie header
    pub fn add_from_header(&self, header: &str, url: &Url) {
        if let Some(cookie) = Cookie::parse(header, url) {
            self.add(cookie);
        }
    }

    /// Get all cookies to send to a URL, most specific path first
    pub fn get_cookies(&self, url: &Url) -> Vec<Cookie> {
        self.remove_expired();

        let mut result: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|c| c.matches(url))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        result.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        result
    }

    /// Get Cookie header value for a URL
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(|c| c.to_header_value())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Find a cookie by name for a URL
    pub fn get(&self, name: &str, url: &Url) -> Option<Cookie> {
        self.get_cookies(url).into_iter().find(|c| c.name == name)
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }

    fn remove_expired(&self) {
        for mut entry in self.cookies.iter_mut() {
            entry.value_mut().retain(|c| !c.is_expired());
        }
        self.cookies.retain(|_, cookies| !cookies.is_empty());
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all_cookies: Vec<Cookie> = self
            .cookies
            .iter()
            .flat_map(|e| e.value().clone())
            .collect();
        serde_json::to_string(&all_cookies)
    }

    /// Replace the jar contents with cookies from JSON, keeping shared handles valid
    pub fn load_json(&self, json: &str) -> serde_json::Result<()> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        self.clear();
        for cookie in cookies {
            self.add(cookie);
        }
        Ok(())
    }

    /// Import cookies from JSON into a new jar
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let jar = CookieJar::new();
        jar.load_json(json)?;
        Ok(jar)
    }

    /// Write the jar to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load the jar contents from a JSON file written by [`CookieJar::save_to_file`]
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        self.load_json(&json)?;
        Ok(())
    }
}

impl reqwest::cookie::CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            if let Ok(value) = header.to_str() {
                self.add_from_header(value, url);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.get_cookie_header(url)
            .and_then(|value| HeaderValue::from_str(&value).ok())
    }
}
