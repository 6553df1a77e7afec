// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captcha image extraction from the CIEC login page

use crate::captcha::CaptchaImage;
use crate::dom::Document;
use crate::error::ScrapeError;

/// Where the CIEC login page places its captcha
pub const DEFAULT_CAPTCHA_SELECTOR: &str = "#divCaptcha > img";

/// Extracts the inline captcha image of a login page
#[derive(Debug, Clone)]
pub struct CaptchaExtractor {
    selector: String,
}

impl Default for CaptchaExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTCHA_SELECTOR)
    }
}

impl CaptchaExtractor {
    /// Create an extractor looking for the image at `selector`
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// Selector used by [`CaptchaExtractor::extract`]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Extract the image using the configured selector
    pub fn extract(&self, html: &str) -> Result<CaptchaImage, ScrapeError> {
        Self::retrieve_captcha_image(html, &self.selector)
    }

    /// Decode the inline `src` of the first element matched by `selector`
    pub fn retrieve_captcha_image(html: &str, selector: &str) -> Result<CaptchaImage, ScrapeError> {
        let doc = Document::parse(html);
        let image = doc
            .query_selector(selector)
            .ok()
            .flatten()
            .ok_or_else(|| ScrapeError::not_found(selector))?;

        CaptchaImage::from_inline_html(image.attr("src").unwrap_or_default())
    }
}
