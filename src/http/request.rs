// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Snapshot of an outgoing request, captured inside every gateway error

use std::collections::HashMap;
use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::headers::HeaderSet;

/// Request as it was sent by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Request method (GET or POST)
    pub method: String,
    /// Requested URL
    pub url: String,
    /// Explicit headers set by the gateway
    pub headers: HashMap<String, String>,
    /// Form fields posted, empty for GET
    pub form: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(
        method: Method,
        url: impl Into<String>,
        headers: &HeaderSet,
        form: &HashMap<String, String>,
    ) -> Self {
        Self {
            method: method.as_str().to_string(),
            url: url.into(),
            headers: headers.clone(),
            form: form.clone(),
        }
    }

    /// Check if this was a POST
    pub fn is_post(&self) -> bool {
        self.method == Method::POST.as_str()
    }

    /// Get a header value, header names are compared ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_captures_request() {
        let mut headers = HeaderSet::new();
        headers.insert("User-Agent".into(), "test".into());
        let mut form = HashMap::new();
        form.insert("Ecom_User_ID".into(), "AAA010101AAA".into());

        let ctx = RequestContext::new(Method::POST, "https://example.com/login", &headers, &form);

        assert!(ctx.is_post());
        assert_eq!(ctx.header("user-agent"), Some("test"));
        assert_eq!(ctx.form.get("Ecom_User_ID").map(String::as_str), Some("AAA010101AAA"));
        assert_eq!(ctx.to_string(), "POST https://example.com/login");
    }

    #[test]
    fn test_context_serializes() {
        let ctx = RequestContext::new(
            Method::GET,
            "https://example.com/",
            &HeaderSet::new(),
            &HashMap::new(),
        );
        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"method\":\"GET\""));
    }
}
