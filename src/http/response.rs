// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Raw response metadata kept when an exchange is rejected

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Response as received, without the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Response status code
    pub status: u16,
    /// Final URL (after redirects)
    pub url: String,
    /// Response headers, repeated headers joined with ", "
    pub headers: HashMap<String, String>,
}

impl RawResponse {
    /// Capture status, final URL and headers of a response
    pub fn new(status: StatusCode, url: &Url, headers: &HeaderMap) -> Self {
        let mut collected: HashMap<String, String> = HashMap::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            collected
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        Self {
            status: status.as_u16(),
            url: url.to_string(),
            headers: collected,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }
}
