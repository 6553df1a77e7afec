// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Portal protocol
//!
//! A [`Portal`] knows the URLs, relay chains and page markers of one site.
//! The session managers drive it and hold no site knowledge of their own.

mod relay;
mod sat;

use std::fmt;

use async_trait::async_trait;

pub use relay::{run_relay, RelayStep};
pub use sat::{SatPortal, SatPortalBuilder, DEFAULT_FIEL_APPLET_URL};

use crate::error::GatewayError;
use crate::html::FormFields;
use crate::http::HttpGateway;

/// Marker of the CIEC login form, present when the portal rejected the login
pub const DEFAULT_CIEC_REJECTED_MARKER: &str = "Ecom_User_ID";

/// Marker of the captcha-less login form, present when the portal rejected the login
pub const DEFAULT_CIEC_WITHOUT_CAPTCHA_REJECTED_MARKER: &str = "frmLog";

/// Site-specific part of a login flow
#[async_trait]
pub trait Portal: Send + Sync + fmt::Debug {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    fn main_url(&self) -> &str;

    fn logout_url(&self) -> &str;

    /// Check if `html` is a page shown only to the authenticated `rfc`
    fn is_authenticated(&self, html: &str, rfc: &str) -> bool;

    fn ciec_rejected_marker(&self) -> &str {
        DEFAULT_CIEC_REJECTED_MARKER
    }

    fn ciec_without_captcha_rejected_marker(&self) -> &str {
        DEFAULT_CIEC_WITHOUT_CAPTCHA_REJECTED_MARKER
    }

    /// Whether the portal accepts FIEL logins at all
    fn supports_fiel(&self) -> bool {
        true
    }

    /// Value sent as `urlApplet` with the FIEL challenge answer
    fn fiel_applet_url(&self) -> &str {
        DEFAULT_FIEL_APPLET_URL
    }

    /// Page holding the CIEC form and its captcha
    async fn get_login_ciec_page(&self, gateway: &HttpGateway) -> Result<String, GatewayError>;

    /// Page holding the FIEL challenge
    async fn get_login_fiel_page(&self, gateway: &HttpGateway) -> Result<String, GatewayError>;

    /// Submit the CIEC form, returns the response page
    async fn post_login_ciec(
        &self,
        gateway: &HttpGateway,
        inputs: &FormFields,
    ) -> Result<String, GatewayError>;

    /// Submit the FIEL challenge answer and follow the portal relays
    async fn post_login_fiel(
        &self,
        gateway: &HttpGateway,
        inputs: &FormFields,
    ) -> Result<String, GatewayError>;

    async fn get_portal_main_page(&self, gateway: &HttpGateway) -> Result<String, GatewayError> {
        gateway.get("get portal main page", self.main_url(), "").await
    }

    /// Main page as seen after any auto-submit the portal needs
    async fn access_portal_main_page(
        &self,
        gateway: &HttpGateway,
    ) -> Result<String, GatewayError> {
        self.get_portal_main_page(gateway).await
    }

    /// End the session, the cookie jar is empty afterwards
    async fn logout(&self, gateway: &HttpGateway) -> Result<String, GatewayError> {
        gateway.get_logout(self.logout_url(), self.main_url()).await
    }
}
