// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # sat-auth - Session authentication for the SAT portals
//!
//! Logs into the SAT web portals and keeps the HTTP session (cookies) alive
//! for later page fetches until logout.
//!
//! ## Features
//!
//! - CIEC login: RFC + password + captcha, with bounded captcha and login retries
//! - FIEL login: certificate challenge signed with the private key
//! - Cookie-tracking HTTP gateway with redirect and effective URI tracking
//! - Logout walker following chains of meta refresh pages
//! - Form, meta refresh and inline captcha scraping over an html5ever DOM
//! - Portal tables for CFDI, AGR, RFC-AMP-C, PSTCD/PISR, CE consulta and Acuses
//! - Cookie jar persistence to resume a session in another process
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sat_auth::{
//!     CaptchaAnswer, CaptchaError, CaptchaImage, CiecSessionManager, HttpGateway, SatPortal,
//!     SessionManager,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = |_: &CaptchaImage| -> Result<CaptchaAnswer, CaptchaError> {
//!         Ok(CaptchaAnswer::new("123456"))
//!     };
//!     let manager = CiecSessionManager::create(
//!         "AAA010101AAA",
//!         "password",
//!         Arc::new(resolver),
//!         Arc::new(SatPortal::cfdi()),
//!         HttpGateway::new()?,
//!     )?;
//!
//!     if !manager.has_login().await {
//!         manager.login().await?;
//!         manager.access_portal_main_page().await?;
//!     }
//!
//!     manager.logout().await?;
//!     Ok(())
//! }
//! ```

pub mod captcha;
pub mod config;
pub mod credential;
pub mod dom;
pub mod error;
pub mod html;
pub mod http;
pub mod portal;
pub mod session;

// Re-exports for convenience

// Errors
pub use error::{
    CiecLoginError, CredentialError, Error, FielLoginError, GatewayError, Result, ScrapeError,
};

// Config
pub use config::GatewayConfig;

// HTTP
pub use http::{Cookie, CookieJar, HttpGateway, RawResponse, RequestContext};

// Scraping
pub use html::{extract_form_fields, CaptchaExtractor, FormFields, HtmlForm, MetaRefresh};

// Capabilities
pub use captcha::{CaptchaAnswer, CaptchaError, CaptchaImage, CaptchaResolver};
pub use credential::{Certificate, Credential, FielCredential, PrivateKeySigner, SignatureAlgorithm};

// Portals
pub use portal::{Portal, RelayStep, SatPortal, SatPortalBuilder};

// Sessions
pub use session::{
    ChallengeResolver, CiecSessionData, CiecSessionManager, FielSessionData, FielSessionManager,
    LoginProbe, SessionManager,
};

/// sat-auth version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
