// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CIEC login: RFC + password + captcha
//!
//! Captcha resolution and the login post each have their own retry budget.
//! A failed captcha fetch is never retried.

mod data;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

pub use data::{CiecSessionData, DEFAULT_MAX_TRIES_CAPTCHA, DEFAULT_MAX_TRIES_LOGIN};

use super::{require_gateway, require_portal, SessionManager};
use crate::captcha::{CaptchaAnswer, CaptchaImage, CaptchaResolver};
use crate::error::{CiecLoginError, Error, GatewayError, Result};
use crate::html::CaptchaExtractor;
use crate::http::HttpGateway;
use crate::portal::Portal;

/// Session manager for CIEC logins
#[derive(Debug, Clone)]
pub struct CiecSessionManager {
    data: CiecSessionData,
    portal: Arc<dyn Portal>,
    gateway: HttpGateway,
    captcha_extractor: CaptchaExtractor,
}

impl CiecSessionManager {
    pub fn new(data: CiecSessionData, portal: Arc<dyn Portal>, gateway: HttpGateway) -> Self {
        Self {
            data,
            portal,
            gateway,
            captcha_extractor: CaptchaExtractor::default(),
        }
    }

    /// Build session data and manager in one go
    pub fn create(
        rfc: impl Into<String>,
        ciec: impl Into<String>,
        captcha_resolver: Arc<dyn CaptchaResolver>,
        portal: Arc<dyn Portal>,
        gateway: HttpGateway,
    ) -> Result<Self> {
        let data = CiecSessionData::new(rfc, ciec, captcha_resolver)?;
        Ok(Self::new(data, portal, gateway))
    }

    pub fn builder(data: CiecSessionData) -> CiecSessionManagerBuilder {
        CiecSessionManagerBuilder::new(data)
    }

    pub fn session_data(&self) -> &CiecSessionData {
        &self.data
    }

    /// Fetch the CIEC login page and read its captcha image
    pub async fn request_captcha_image(&self) -> std::result::Result<CaptchaImage, CiecLoginError> {
        let html = self
            .portal
            .get_login_ciec_page(&self.gateway)
            .await
            .map_err(|source| self.connection_error("getting captcha image", source))?;

        self.captcha_extractor
            .extract(&html)
            .map_err(|source| CiecLoginError::NoCaptchaImageFound {
                rfc: self.data.rfc().to_string(),
                contents: html,
                source,
            })
    }

    /// Ask the resolver for a captcha answer, fetching a fresh image on every attempt
    pub async fn get_captcha_value(&self) -> std::result::Result<CaptchaAnswer, CiecLoginError> {
        let max_tries = self.data.max_tries_captcha();
        let mut attempt = 1;

        loop {
            let image = self.request_captcha_image().await?;
            match self.data.captcha_resolver().resolve(&image).await {
                Ok(answer) => return Ok(answer),
                Err(err) if attempt < max_tries => {
                    tracing::warn!(attempt, max_tries, error = %err, "Captcha not resolved, retrying");
                    attempt += 1;
                }
                Err(source) => {
                    return Err(CiecLoginError::CaptchaWithoutAnswer {
                        rfc: self.data.rfc().to_string(),
                        image,
                        source,
                    })
                }
            }
        }
    }

    /// Post the credentials with a captcha answer
    pub async fn login_post_login_data(
        &self,
        captcha: &CaptchaAnswer,
    ) -> std::result::Result<(), CiecLoginError> {
        let mut post_data = HashMap::new();
        post_data.insert("Ecom_User_ID".to_string(), self.data.rfc().to_string());
        post_data.insert("Ecom_Password".to_string(), self.data.ciec().to_string());
        post_data.insert("option".to_string(), "credential".to_string());
        post_data.insert("submit".to_string(), "Enviar".to_string());
        post_data.insert("userCaptcha".to_string(), captcha.value().to_string());

        let marker = self.portal.ciec_rejected_marker().to_string();
        self.post_login(post_data, &marker).await
    }

    /// Post the credentials to a login endpoint that asks for no captcha
    pub async fn login_without_captcha(&self) -> Result<()> {
        let mut post_data = HashMap::new();
        post_data.insert("Username".to_string(), self.data.rfc().to_string());
        post_data.insert("Password".to_string(), self.data.ciec().to_string());

        let marker = self.portal.ciec_without_captcha_rejected_marker().to_string();
        self.post_login(post_data, &marker).await?;
        tracing::info!(rfc = %self.data.rfc(), portal = %self.portal.name(), "Logged in without captcha");
        Ok(())
    }

    async fn post_login(
        &self,
        post_data: HashMap<String, String>,
        rejected_marker: &str,
    ) -> std::result::Result<(), CiecLoginError> {
        let response = self
            .portal
            .post_login_ciec(&self.gateway, &post_data)
            .await
            .map_err(|source| self.connection_error("sending login data", source))?;

        if response.contains(rejected_marker) {
            return Err(CiecLoginError::IncorrectLoginData {
                rfc: self.data.rfc().to_string(),
                contents: response,
                posted_data: post_data,
            });
        }

        Ok(())
    }

    fn connection_error(&self, when: &str, source: GatewayError) -> CiecLoginError {
        CiecLoginError::Connection {
            when: when.to_string(),
            rfc: self.data.rfc().to_string(),
            source,
        }
    }
}

#[async_trait]
impl SessionManager for CiecSessionManager {
    fn rfc(&self) -> &str {
        self.data.rfc()
    }

    fn portal(&self) -> &dyn Portal {
        self.portal.as_ref()
    }

    fn gateway(&self) -> &HttpGateway {
        &self.gateway
    }

    async fn login(&self) -> Result<()> {
        let max_tries = self.data.max_tries_login();
        let mut attempt = 1;

        loop {
            tracing::info!(rfc = %self.data.rfc(), portal = %self.portal.name(), attempt, "CIEC login");
            let captcha = self.get_captcha_value().await?;

            match self.login_post_login_data(&captcha).await {
                Ok(()) => return Ok(()),
                Err(err) if attempt < max_tries => {
                    tracing::warn!(attempt, max_tries, error = %err, "CIEC login rejected, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn access_portal_main_page(&self) -> Result<String> {
        let html = self
            .portal
            .access_portal_main_page(&self.gateway)
            .await
            .map_err(|source| self.connection_error("registering on login page", source))?;

        if !self.portal.is_authenticated(&html, self.data.rfc()) {
            return Err(CiecLoginError::NotRegisteredAfterLogin {
                rfc: self.data.rfc().to_string(),
                contents: html,
            }
            .into());
        }

        Ok(html)
    }
}

/// Builder for [`CiecSessionManager`], portal and gateway are required
#[derive(Debug)]
pub struct CiecSessionManagerBuilder {
    data: CiecSessionData,
    portal: Option<Arc<dyn Portal>>,
    gateway: Option<HttpGateway>,
    captcha_extractor: CaptchaExtractor,
}

impl CiecSessionManagerBuilder {
    pub fn new(data: CiecSessionData) -> Self {
        Self {
            data,
            portal: None,
            gateway: None,
            captcha_extractor: CaptchaExtractor::default(),
        }
    }

    pub fn portal(mut self, portal: Arc<dyn Portal>) -> Self {
        self.portal = Some(portal);
        self
    }

    pub fn gateway(mut self, gateway: HttpGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Selector of the captcha `<img>` on the login page
    pub fn captcha_selector(mut self, selector: impl Into<String>) -> Self {
        self.captcha_extractor = CaptchaExtractor::new(selector);
        self
    }

    pub fn build(self) -> std::result::Result<CiecSessionManager, Error> {
        Ok(CiecSessionManager {
            data: self.data,
            portal: require_portal(self.portal)?,
            gateway: require_gateway(self.gateway)?,
            captcha_extractor: self.captcha_extractor,
        })
    }
}
