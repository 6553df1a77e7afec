// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session state machines
//!
//! Both credential kinds share one lifecycle: check for an existing login,
//! log in, confirm the portal main page, log out. Site knowledge comes from
//! the [`Portal`]; every request goes through the shared [`HttpGateway`].

pub mod ciec;
pub mod fiel;

use std::sync::Arc;

use async_trait::async_trait;

pub use ciec::{CiecSessionData, CiecSessionManager, CiecSessionManagerBuilder};
pub use fiel::{ChallengeResolver, FielSessionData, FielSessionManager, FielSessionManagerBuilder};

use crate::error::{Error, GatewayError, Result};
use crate::http::HttpGateway;
use crate::portal::Portal;

/// Message of the configuration error raised when no portal was given
pub(crate) const MISSING_PORTAL: &str = "Must set portal property before use";

/// Message of the configuration error raised when no gateway was given
pub(crate) const MISSING_GATEWAY: &str = "Must set gateway property before use";

/// Outcome of checking for an existing login
#[derive(Debug)]
pub enum LoginProbe {
    /// The main page shows the session RFC
    Authenticated,
    /// Empty cookie jar, or the main page is not an authenticated one
    NotAuthenticated,
    /// The main page could not be fetched
    ProbeFailed(GatewayError),
}

impl LoginProbe {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginProbe::Authenticated)
    }
}

/// Lifecycle shared by the CIEC and FIEL session managers
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// RFC of the session owner
    fn rfc(&self) -> &str;

    fn portal(&self) -> &dyn Portal;

    fn gateway(&self) -> &HttpGateway;

    /// Check for an existing login without failing.
    ///
    /// An empty cookie jar means no session was ever opened, so no request is made.
    async fn probe(&self) -> LoginProbe {
        if self.gateway().is_cookie_jar_empty() {
            return LoginProbe::NotAuthenticated;
        }

        match self.portal().get_portal_main_page(self.gateway()).await {
            Ok(html) if self.portal().is_authenticated(&html, self.rfc()) => {
                LoginProbe::Authenticated
            }
            Ok(_) => LoginProbe::NotAuthenticated,
            Err(err) => LoginProbe::ProbeFailed(err),
        }
    }

    /// Check for an existing login, probe failures count as no login
    async fn has_login(&self) -> bool {
        match self.probe().await {
            LoginProbe::Authenticated => true,
            LoginProbe::NotAuthenticated => false,
            LoginProbe::ProbeFailed(err) => {
                tracing::warn!(
                    portal = %self.portal().name(),
                    error = %err,
                    "Unable to check login, assuming logged out"
                );
                false
            }
        }
    }

    /// Log in with the session credentials
    async fn login(&self) -> Result<()>;

    /// Open the portal main page and confirm it belongs to the session RFC
    async fn access_portal_main_page(&self) -> Result<String>;

    /// End the portal session and clear the cookie jar
    async fn logout(&self) -> Result<()> {
        self.portal().logout(self.gateway()).await?;
        tracing::info!(portal = %self.portal().name(), "Session closed");
        Ok(())
    }
}

pub(crate) fn require_portal(portal: Option<Arc<dyn Portal>>) -> Result<Arc<dyn Portal>> {
    portal.ok_or_else(|| Error::config(MISSING_PORTAL))
}

pub(crate) fn require_gateway(gateway: Option<HttpGateway>) -> Result<HttpGateway> {
    gateway.ok_or_else(|| Error::config(MISSING_GATEWAY))
}
