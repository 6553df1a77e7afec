// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Meta refresh target extraction

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::dom::Document;

lazy_static! {
    /// `content` of a refresh tag: optional delay, separator, optional `url=` and the target
    static ref REFRESH_CONTENT: Regex =
        Regex::new(r#"(?i)^\s*[0-9.]*\s*[;,]?\s*(?:url\s*=\s*)?(.*?)\s*$"#)
            .expect("refresh content pattern is valid");
}

/// Reads `<meta http-equiv="refresh" content="N; url=TARGET">`
pub struct MetaRefresh;

impl MetaRefresh {
    /// Target of the first refresh tag resolved against `base_url`.
    ///
    /// An absolute target is returned in normalized form; a relative one is resolved
    /// against the server (leading `/`) or the base directory. Empty when the
    /// page has no refresh tag or the target cannot be resolved.
    pub fn obtain_url(html: &str, base_url: &str) -> String {
        let target = match Self::raw_target(html) {
            Some(target) if !target.is_empty() => target,
            _ => return String::new(),
        };

        if let Ok(url) = Url::parse(&target) {
            return url.to_string();
        }

        Url::parse(base_url)
            .and_then(|base| base.join(&target))
            .map(|url| url.to_string())
            .unwrap_or_default()
    }

    /// Target exactly as written in the first refresh tag
    pub fn raw_target(html: &str) -> Option<String> {
        let doc = Document::parse(html);
        let content = doc
            .elements()
            .filter(|e| e.tag_name() == "meta")
            .find(|e| {
                e.attr("http-equiv")
                    .map_or(false, |v| v.trim().eq_ignore_ascii_case("refresh"))
            })
            .and_then(|e| e.attr("content"))?;

        let captures = REFRESH_CONTENT.captures(content)?;
        let target = captures.get(1)?.as_str().trim_matches(|c| c == '\'' || c == '"');
        Some(target.trim().to_string())
    }
}
