// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::fmt;
use std::sync::Arc;

use crate::captcha::CaptchaResolver;
use crate::error::{Error, Result};

pub const DEFAULT_MAX_TRIES_CAPTCHA: usize = 3;

pub const DEFAULT_MAX_TRIES_LOGIN: usize = 3;

/// Credentials of a CIEC login
#[derive(Clone)]
pub struct CiecSessionData {
    rfc: String,
    ciec: String,
    captcha_resolver: Arc<dyn CaptchaResolver>,
    max_tries_captcha: usize,
    max_tries_login: usize,
}

impl fmt::Debug for CiecSessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CiecSessionData")
            .field("rfc", &self.rfc)
            .field("ciec", &"********")
            .field("max_tries_captcha", &self.max_tries_captcha)
            .field("max_tries_login", &self.max_tries_login)
            .finish()
    }
}

impl CiecSessionData {
    /// Create session data with the default retry budgets
    pub fn new(
        rfc: impl Into<String>,
        ciec: impl Into<String>,
        captcha_resolver: Arc<dyn CaptchaResolver>,
    ) -> Result<Self> {
        Self::with_tries(
            rfc,
            ciec,
            captcha_resolver,
            DEFAULT_MAX_TRIES_CAPTCHA,
            DEFAULT_MAX_TRIES_LOGIN,
        )
    }

    /// Create session data with custom retry budgets, values below 1 become 1
    pub fn with_tries(
        rfc: impl Into<String>,
        ciec: impl Into<String>,
        captcha_resolver: Arc<dyn CaptchaResolver>,
        max_tries_captcha: usize,
        max_tries_login: usize,
    ) -> Result<Self> {
        let rfc = rfc.into();
        let ciec = ciec.into();
        if rfc.is_empty() {
            return Err(Error::empty_input("RFC"));
        }
        if ciec.is_empty() {
            return Err(Error::empty_input("CIEC"));
        }

        Ok(Self {
            rfc,
            ciec,
            captcha_resolver,
            max_tries_captcha: max_tries_captcha.max(1),
            max_tries_login: max_tries_login.max(1),
        })
    }

    pub fn rfc(&self) -> &str {
        &self.rfc
    }

    pub fn ciec(&self) -> &str {
        &self.ciec
    }

    pub fn captcha_resolver(&self) -> &dyn CaptchaResolver {
        self.captcha_resolver.as_ref()
    }

    pub fn max_tries_captcha(&self) -> usize {
        self.max_tries_captcha
    }

    pub fn max_tries_login(&self) -> usize {
        self.max_tries_login
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captcha::{CaptchaAnswer, CaptchaError, CaptchaImage};

    fn resolver() -> Arc<dyn CaptchaResolver> {
        Arc::new(|_: &CaptchaImage| -> std::result::Result<CaptchaAnswer, CaptchaError> {
            Ok(CaptchaAnswer::new("123456"))
        })
    }

    #[test]
    fn test_defaults() {
        let data = CiecSessionData::new("AAA010101AAA", "secret", resolver()).unwrap();
        assert_eq!(data.rfc(), "AAA010101AAA");
        assert_eq!(data.ciec(), "secret");
        assert_eq!(data.max_tries_captcha(), 3);
        assert_eq!(data.max_tries_login(), 3);
    }

    #[test]
    fn test_tries_are_clamped() {
        let data = CiecSessionData::with_tries("AAA010101AAA", "secret", resolver(), 0, 0).unwrap();
        assert_eq!(data.max_tries_captcha(), 1);
        assert_eq!(data.max_tries_login(), 1);

        let data = CiecSessionData::with_tries("AAA010101AAA", "secret", resolver(), 5, 7).unwrap();
        assert_eq!(data.max_tries_captcha(), 5);
        assert_eq!(data.max_tries_login(), 7);
    }

    #[test]
    fn test_empty_values_are_rejected() {
        let err = CiecSessionData::new("", "secret", resolver()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument RFC is empty");

        let err = CiecSessionData::new("AAA010101AAA", "", resolver()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument CIEC is empty");
    }

    #[test]
    fn test_debug_hides_ciec() {
        let data = CiecSessionData::new("AAA010101AAA", "top-secret", resolver()).unwrap();
        let debug = format!("{:?}", data);
        assert!(debug.contains("AAA010101AAA"));
        assert!(!debug.contains("top-secret"));
    }
}
