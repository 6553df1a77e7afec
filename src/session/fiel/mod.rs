// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! FIEL login: certificate challenge signed with the private key

mod challenge;
mod data;

use std::sync::Arc;

use async_trait::async_trait;

pub use challenge::ChallengeResolver;
pub use data::FielSessionData;

use super::{require_gateway, require_portal, SessionManager};
use crate::credential::FielCredential;
use crate::error::{Error, FielLoginError, GatewayError, Result};
use crate::http::HttpGateway;
use crate::portal::Portal;

/// Session manager for FIEL logins
#[derive(Debug, Clone)]
pub struct FielSessionManager {
    data: FielSessionData,
    portal: Arc<dyn Portal>,
    gateway: HttpGateway,
}

impl FielSessionManager {
    pub fn new(data: FielSessionData, portal: Arc<dyn Portal>, gateway: HttpGateway) -> Self {
        Self {
            data,
            portal,
            gateway,
        }
    }

    pub fn create(
        credential: Arc<dyn FielCredential>,
        portal: Arc<dyn Portal>,
        gateway: HttpGateway,
    ) -> Self {
        Self::new(FielSessionData::new(credential), portal, gateway)
    }

    pub fn builder(data: FielSessionData) -> FielSessionManagerBuilder {
        FielSessionManagerBuilder::new(data)
    }

    pub fn session_data(&self) -> &FielSessionData {
        &self.data
    }

    fn connection_error(&self, when: &str, source: GatewayError) -> FielLoginError {
        FielLoginError::Connection {
            when: when.to_string(),
            rfc: self.data.rfc().to_string(),
            source,
        }
    }

    async fn login_internal(&self) -> std::result::Result<(), FielLoginError> {
        const WHEN: &str = "try to login using FIEL";

        if !self.portal.supports_fiel() {
            return Err(FielLoginError::Unsupported {
                rfc: self.data.rfc().to_string(),
                portal: self.portal.name().to_string(),
            });
        }
        if !self.data.is_valid_now() {
            tracing::warn!(rfc = %self.data.rfc(), valid_to = %self.data.valid_to(), "FIEL certificate is not valid now");
        }

        let html = self
            .portal
            .get_login_fiel_page(&self.gateway)
            .await
            .map_err(|source| self.connection_error(WHEN, source))?;

        let inputs = ChallengeResolver::from_html(&html, &self.data, self.portal.fiel_applet_url())
            .obtain_form_fields()?;

        self.portal
            .post_login_fiel(&self.gateway, &inputs)
            .await
            .map_err(|source| self.connection_error(WHEN, source))?;

        Ok(())
    }
}

#[async_trait]
impl SessionManager for FielSessionManager {
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
        tracing::info!(rfc = %self.data.rfc(), portal = %self.portal.name(), "FIEL login");
        self.login_internal().await?;
        Ok(())
    }

    async fn access_portal_main_page(&self) -> Result<String> {
        let html = self
            .portal
            .access_portal_main_page(&self.gateway)
            .await
            .map_err(|source| self.connection_error("registering on login page", source))?;

        if !self.portal.is_authenticated(&html, self.data.rfc()) {
            return Err(FielLoginError::NotRegisteredAfterLogin {
                rfc: self.data.rfc().to_string(),
                contents: html,
            }
            .into());
        }

        Ok(html)
    }
}

/// Builder for [`FielSessionManager`], portal and gateway are required
#[derive(Debug)]
pub struct FielSessionManagerBuilder {
    data: FielSessionData,
    portal: Option<Arc<dyn Portal>>,
    gateway: Option<HttpGateway>,
}

impl FielSessionManagerBuilder {
    pub fn new(data: FielSessionData) -> Self {
        Self {
            data,
            portal: None,
            gateway: None,
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

    pub fn build(self) -> std::result::Result<FielSessionManager, Error> {
        Ok(FielSessionManager {
            data: self.data,
            portal: require_portal(self.portal)?,
            gateway: require_gateway(self.gateway)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::credential::{Certificate, Credential, SignatureAlgorithm};
    use crate::error::CredentialError;
    use crate::portal::SatPortal;

    const FIXTURE: &[u8] = include_bytes!("../../../tests/fixtures/fiel-certificate.cer");

    fn credential() -> Arc<dyn FielCredential> {
        Arc::new(Credential::new(
            Certificate::from_der(FIXTURE).unwrap(),
            Arc::new(|data: &[u8], _: SignatureAlgorithm| -> std::result::Result<Vec<u8>, CredentialError> {
                Ok(data.to_vec())
            }),
        ))
    }

    fn gateway() -> HttpGateway {
        HttpGateway::with_config(GatewayConfig::for_testing()).unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_portal_makes_no_request() {
        let manager = FielSessionManager::create(credential(), Arc::new(SatPortal::acuses()), gateway());

        let err = manager.login().await.unwrap_err();
        match err {
            Error::Fiel(FielLoginError::Unsupported { portal, rfc }) => {
                assert_eq!(portal, "acuses");
                assert_eq!(rfc, "EKU9003173C9");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(manager.gateway().effective_uri().is_empty());
    }

    #[tokio::test]
    async fn test_connection_error_names_fiel_login() {
        let portal = SatPortal::builder("down")
            .main_url("http://127.0.0.1:1/main")
            .logout_url("http://127.0.0.1:1/logout")
            .login_ciec_url("http://127.0.0.1:1/ciec")
            .login_fiel_url("http://127.0.0.1:1/fiel")
            .authenticated_marker("{rfc}")
            .build()
            .unwrap();
        let manager = FielSessionManager::create(credential(), Arc::new(portal), gateway());

        let err = manager.login().await.unwrap_err();
        assert!(err.is_connection_error());
        assert_eq!(err.to_string(), "Connection error when try to login using FIEL");
    }

    #[tokio::test]
    async fn test_builder_requires_portal() {
        let err = FielSessionManager::builder(FielSessionData::new(credential()))
            .gateway(gateway())
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Must set portal property before use"
        );
    }
}
