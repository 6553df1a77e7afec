// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captcha capability: the image handed to a resolver and its answer
//!
//! Solving captchas is left to the caller, who plugs a [`CaptchaResolver`]
//! into the CIEC session data.

use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::error::ScrapeError;

/// Errors reported by a captcha resolver
#[derive(Error, Debug)]
pub enum CaptchaError {
    /// The resolver could not produce an answer for this image
    #[error("Captcha resolver returned no answer: {0}")]
    NoAnswer(String),

    /// The resolver backend failed
    #[error("Captcha resolver failed: {0}")]
    Resolver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CaptchaError {
    /// Create a no-answer error
    pub fn no_answer(msg: impl Into<String>) -> Self {
        CaptchaError::NoAnswer(msg.into())
    }
}

/// Captcha image decoded from an inline `data:` URI
#[derive(Clone, PartialEq, Eq)]
pub struct CaptchaImage {
    mime_type: String,
    base64: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for CaptchaImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptchaImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl CaptchaImage {
    /// Parse `data:<mime>;base64,<payload>`
    pub fn from_inline_html(src: &str) -> Result<Self, ScrapeError> {
        let src = src.trim();
        let rest = src
            .strip_prefix("data:")
            .ok_or_else(|| ScrapeError::InlineImage("source is not a data URI".into()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ScrapeError::InlineImage("data URI without payload".into()))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ScrapeError::InlineImage("data URI is not base64 encoded".into()))?;

        Self::from_base64(mime_type, payload)
    }

    /// Build an image from its mime type and base64 payload
    pub fn from_base64(mime_type: &str, payload: &str) -> Result<Self, ScrapeError> {
        let base64: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(&base64)
            .map_err(|e| ScrapeError::InlineImage(format!("invalid base64 payload: {}", e)))?;
        if bytes.is_empty() {
            return Err(ScrapeError::InlineImage("empty image".into()));
        }

        Ok(Self {
            mime_type: mime_type.trim().to_string(),
            base64,
            bytes,
        })
    }

    /// Mime type declared by the data URI (may be empty)
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Payload exactly as embedded in the page
    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    /// Decoded image bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Image as an inline `data:` URI
    pub fn as_inline_html(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Text read from a captcha image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaAnswer(String);

impl CaptchaAnswer {
    /// Create an answer
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Answer value
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaptchaAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaptchaAnswer {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Solves captcha images
#[async_trait]
pub trait CaptchaResolver: Send + Sync {
    /// Read the text of a captcha image
    async fn resolve(&self, image: &CaptchaImage) -> Result<CaptchaAnswer, CaptchaError>;
}

/// Plain functions and closures work as resolvers
#[async_trait]
impl<F> CaptchaResolver for F
where
    F: Fn(&CaptchaImage) -> Result<CaptchaAnswer, CaptchaError> + Send + Sync,
{
    async fn resolve(&self, image: &CaptchaImage) -> Result<CaptchaAnswer, CaptchaError> {
        (self)(image)
    }
}
