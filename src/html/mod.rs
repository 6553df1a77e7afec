// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML scraping primitives used by the login flows
//!
//! - [`HtmlForm`]: name/value pairs of the inputs and selects under a container
//! - [`MetaRefresh`]: target of a `<meta http-equiv="refresh">` tag
//! - [`CaptchaExtractor`]: inline captcha image of the CIEC login page

mod captcha;
mod form;
mod meta_refresh;

use std::collections::HashMap;

pub use captcha::{CaptchaExtractor, DEFAULT_CAPTCHA_SELECTOR};
pub use form::HtmlForm;
pub use meta_refresh::MetaRefresh;

use crate::error::ScrapeError;

/// Form field names mapped to their values
pub type FormFields = HashMap<String, String>;

/// Read the values of every input and select under `scope`, skipping the names
/// matched by any of `exclude_patterns`
pub fn extract_form_fields(
    html: &str,
    scope: &str,
    exclude_patterns: &[&str],
) -> Result<FormFields, ScrapeError> {
    Ok(HtmlForm::with_exclude_patterns(html, scope, exclude_patterns)?.get_form_values())
}
