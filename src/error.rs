// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for sat-auth
//!
//! Every failure carries enough context (request, posted data, response body,
//! underlying cause) to be diagnosed without re-running the request.

use std::collections::HashMap;

use thiserror::Error;

use crate::captcha::{CaptchaError, CaptchaImage};
use crate::http::{RawResponse, RequestContext};

/// Result type alias for sat-auth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// A required collaborator or setting was not provided
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument on construction
    #[error("Invalid argument {0} is empty")]
    InvalidArgument(String),

    /// HTTP gateway failure
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// HTML scraping failure
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// Login failure using CIEC
    #[error(transparent)]
    Ciec(#[from] CiecLoginError),

    /// Login failure using FIEL
    #[error(transparent)]
    Fiel(#[from] FielLoginError),

    /// Certificate or signing failure
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an empty argument error
    pub fn empty_input(name: impl Into<String>) -> Self {
        Error::InvalidArgument(name.into())
    }

    /// Check if this is a login error (CIEC or FIEL)
    pub fn is_login_error(&self) -> bool {
        matches!(self, Error::Ciec(_) | Error::Fiel(_))
    }

    /// Check if this error was caused by the connection with the portal
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Error::Gateway(_)
                | Error::Ciec(CiecLoginError::Connection { .. })
                | Error::Fiel(FielLoginError::Connection { .. })
        )
    }

    /// Request that produced the failure, if any
    pub fn request_context(&self) -> Option<&RequestContext> {
        match self {
            Error::Gateway(e) => e.request_context(),
            Error::Ciec(CiecLoginError::Connection { source, .. }) => source.request_context(),
            Error::Fiel(FielLoginError::Connection { source, .. }) => source.request_context(),
            _ => None,
        }
    }
}

/// Errors produced by the HTTP gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport failure (connect, timeout, TLS, redirect loop) or HTTP error status
    #[error("HTTP client error when {reason}: {} {}", .context.method, .context.url)]
    Client {
        reason: String,
        context: RequestContext,
        status: Option<u16>,
        /// Status line and headers of an error status response
        response: Option<RawResponse>,
        /// Body of an error status response
        body: Option<String>,
        #[source]
        source: reqwest::Error,
    },

    /// The exchange succeeded but the body was empty
    #[error("Unexpected empty content when {reason}")]
    Response {
        reason: String,
        context: RequestContext,
        response: RawResponse,
    },

    /// The logout redirect chain did not settle
    #[error("Logout did not settle after {hops} meta refresh hops, last destination {destination}")]
    LogoutLoop { destination: String, hops: usize },
}

impl GatewayError {
    /// Request that produced the failure
    pub fn request_context(&self) -> Option<&RequestContext> {
        match self {
            GatewayError::Client { context, .. } | GatewayError::Response { context, .. } => {
                Some(context)
            }
            GatewayError::LogoutLoop { .. } => None,
        }
    }

    /// Response metadata if a response was received
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            GatewayError::Client { response, .. } => response.as_ref(),
            GatewayError::Response { response, .. } => Some(response),
            GatewayError::LogoutLoop { .. } => None,
        }
    }

    /// Body of an error status response
    pub fn body(&self) -> Option<&str> {
        match self {
            GatewayError::Client { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Client { status, .. } => *status,
            GatewayError::Response { response, .. } => Some(response.status),
            GatewayError::LogoutLoop { .. } => None,
        }
    }

    /// Check if the transport timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Client { source, .. } if source.is_timeout())
    }

    /// Check if the response body was unexpectedly empty
    pub fn is_empty_response(&self) -> bool {
        matches!(self, GatewayError::Response { .. })
    }
}

/// Errors produced while scraping HTML
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Selector matched nothing
    #[error("Unable to find image using filter '{selector}'")]
    NotFound { selector: String },

    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// Element name exclusion pattern is not a valid regular expression
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The image source is not an inline base64 data URI
    #[error("Invalid inline image: {0}")]
    InlineImage(String),
}

impl ScrapeError {
    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(selector: impl Into<String>) -> Self {
        ScrapeError::NotFound {
            selector: selector.into(),
        }
    }
}

/// Login errors using CIEC (RFC + password + captcha)
#[derive(Error, Debug)]
pub enum CiecLoginError {
    #[error("Connection error when {when}")]
    Connection {
        when: String,
        rfc: String,
        #[source]
        source: GatewayError,
    },

    #[error("It was expected to have the session registered on portal home page with RFC {rfc}")]
    NotRegisteredAfterLogin { rfc: String, contents: String },

    #[error("It was unable to find the captcha image")]
    NoCaptchaImageFound {
        rfc: String,
        contents: String,
        #[source]
        source: ScrapeError,
    },

    #[error("Unable to decode captcha")]
    CaptchaWithoutAnswer {
        rfc: String,
        image: CaptchaImage,
        #[source]
        source: CaptchaError,
    },

    #[error("Incorrect login data")]
    IncorrectLoginData {
        rfc: String,
        contents: String,
        posted_data: HashMap<String, String>,
    },
}

impl CiecLoginError {
    /// RFC of the session that failed
    pub fn rfc(&self) -> &str {
        match self {
            CiecLoginError::Connection { rfc, .. }
            | CiecLoginError::NotRegisteredAfterLogin { rfc, .. }
            | CiecLoginError::NoCaptchaImageFound { rfc, .. }
            | CiecLoginError::CaptchaWithoutAnswer { rfc, .. }
            | CiecLoginError::IncorrectLoginData { rfc, .. } => rfc,
        }
    }

    /// Page contents that caused the failure (empty when there is none)
    pub fn contents(&self) -> &str {
        match self {
            CiecLoginError::NotRegisteredAfterLogin { contents, .. }
            | CiecLoginError::NoCaptchaImageFound { contents, .. }
            | CiecLoginError::IncorrectLoginData { contents, .. } => contents,
            _ => "",
        }
    }

    /// Data posted to the login page, if any
    pub fn posted_data(&self) -> Option<&HashMap<String, String>> {
        match self {
            CiecLoginError::IncorrectLoginData { posted_data, .. } => Some(posted_data),
            _ => None,
        }
    }

    /// Captcha image that could not be answered
    pub fn captcha_image(&self) -> Option<&CaptchaImage> {
        match self {
            CiecLoginError::CaptchaWithoutAnswer { image, .. } => Some(image),
            _ => None,
        }
    }
}

/// Login errors using FIEL (certificate + private key)
#[derive(Error, Debug)]
pub enum FielLoginError {
    #[error("Connection error when {when}")]
    Connection {
        when: String,
        rfc: String,
        #[source]
        source: GatewayError,
    },

    #[error("It was expected to have the session registered on portal home page with RFC {rfc}")]
    NotRegisteredAfterLogin { rfc: String, contents: String },

    #[error("Unable to resolve the FIEL challenge: {reason}")]
    Challenge {
        rfc: String,
        reason: String,
        contents: String,
    },

    #[error("Unable to sign the FIEL challenge")]
    Signature {
        rfc: String,
        #[source]
        source: CredentialError,
    },

    #[error("Portal {portal} does not accept FIEL login")]
    Unsupported { rfc: String, portal: String },
}

impl FielLoginError {
    /// RFC of the session that failed
    pub fn rfc(&self) -> &str {
        match self {
            FielLoginError::Connection { rfc, .. }
            | FielLoginError::NotRegisteredAfterLogin { rfc, .. }
            | FielLoginError::Challenge { rfc, .. }
            | FielLoginError::Signature { rfc, .. }
            | FielLoginError::Unsupported { rfc, .. } => rfc,
        }
    }

    /// Page contents that caused the failure (empty when there is none)
    pub fn contents(&self) -> &str {
        match self {
            FielLoginError::NotRegisteredAfterLogin { contents, .. }
            | FielLoginError::Challenge { contents, .. } => contents,
            _ => "",
        }
    }
}

/// Certificate and private key failures
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Unable to read certificate: {0}")]
    Certificate(String),

    #[error("Certificate subject does not contain an RFC")]
    MissingRfc,

    #[error("Unable to sign data: {0}")]
    Signing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = Error::config("Must set portal property before use");
        assert_eq!(
            err.to_string(),
            "Configuration error: Must set portal property before use"
        );
        assert!(!err.is_login_error());
    }

    #[test]
    fn test_empty_input_message() {
        assert_eq!(
            Error::empty_input("RFC").to_string(),
            "Invalid argument RFC is empty"
        );
    }

    #[test]
    fn test_not_found_names_selector() {
        let err = ScrapeError::not_found("#divCaptcha > img");
        assert_eq!(
            err.to_string(),
            "Unable to find image using filter '#divCaptcha > img'"
        );
    }

    #[test]
    fn test_ciec_error_accessors() {
        let mut posted = HashMap::new();
        posted.insert("Ecom_User_ID".to_string(), "AAA010101AAA".to_string());
        let err = CiecLoginError::IncorrectLoginData {
            rfc: "AAA010101AAA".into(),
            contents: "<form name=\"IDPLogin\">".into(),
            posted_data: posted,
        };

        assert_eq!(err.rfc(), "AAA010101AAA");
        assert!(err.contents().contains("IDPLogin"));
        assert_eq!(err.posted_data().map(|p| p.len()), Some(1));
        assert!(err.captcha_image().is_none());

        let err: Error = err.into();
        assert!(err.is_login_error());
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_fiel_error_message() {
        let err = FielLoginError::NotRegisteredAfterLogin {
            rfc: "EKU9003173C9".into(),
            contents: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "It was expected to have the session registered on portal home page with RFC EKU9003173C9"
        );
    }
}
