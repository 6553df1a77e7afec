// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! SAT portals as data: URLs, relay chains and authenticated-page markers

use async_trait::async_trait;

use super::relay::{run_relay, RelayStep};
use super::{Portal, DEFAULT_CIEC_REJECTED_MARKER, DEFAULT_CIEC_WITHOUT_CAPTCHA_REJECTED_MARKER};
use crate::error::{Error, GatewayError, Result};
use crate::html::{FormFields, HtmlForm};
use crate::http::HttpGateway;

/// Applet URL the FIEL challenge answer declares
pub const DEFAULT_FIEL_APPLET_URL: &str = "https://cfdiau.sat.gob.mx/nidp/app/login?id=SATx509Custom";

/// Placeholder replaced by the session RFC inside authenticated markers
const RFC_PLACEHOLDER: &str = "{rfc}";

const REASON_MAIN_PAGE: &str = "get portal main page";
const REASON_POST_MAIN_PAGE: &str = "post to portal main page";

mod cfdi {
    pub const MAIN: &str = "https://portalcfdi.facturaelectronica.sat.gob.mx/";
    pub const LOGOUT: &str = "https://portalcfdi.facturaelectronica.sat.gob.mx/logout.aspx";
    pub const LOGIN_FIEL: &str =
        "https://cfdiau.sat.gob.mx/nidp/app/login?id=SATx509Custom&sid=0&option=credential&sid=0";
    pub const LOGIN_CIEC: &str =
        "https://cfdiau.sat.gob.mx/nidp/wsfed/ep?id=SATUPCFDiCon&sid=0&option=credential&sid=0";
}

mod agr {
    pub const MAIN: &str = "https://agr.siat.sat.gob.mx/app/seg/SessionBroker?url=/PTSC/notificacionElectronica/faces/Pages/principalNotificaciones.jsf&parametro=c&idSessionBit=null";
    pub const AFTER_FIEL: &str = "https://agr.siat.sat.gob.mx/app/seg/cont/accesoC?url=/PTSC/notificacionElectronica/faces/Pages/principalNotificaciones.jsf&idSessionBit=null";
    pub const SSO: &str = "https://login.siat.sat.gob.mx/nidp/saml2/sso";
    pub const LOGIN_POST: &str = "https://agr.siat.sat.gob.mx/cloudc/saml2/sp/acs/post";
    pub const LOGOUT: &str = "https://login.siat.sat.gob.mx/nidp/app/plogout";
    pub const LOGOUT_POST: &str = "https://agr.siat.sat.gob.mx/cloudc/saml2slo/endpoint";
    pub const LOGIN_FIEL: &str =
        "https://login.siat.sat.gob.mx/nidp/idff/sso?id=fiel&sid=0&option=credential&sid=0";
    pub const LOGIN_CIEC: &str =
        "https://login.siat.sat.gob.mx/nidp/idff/sso?id=ptsc-ciec&sid=0&option=credential&sid=0";
}

mod rfc_amp_c {
    pub const MAIN: &str = "https://rfcampc.siat.sat.gob.mx/app/seg/SessionBroker?url=/PTSC/IdcSiat/autc/ReimpresionTramite/ConsultaTramite.jsf&parametro=c&idSessionBit=null";
    pub const SSO: &str = "https://login.siat.sat.gob.mx/nidp/saml2/sso";
    pub const LOGIN_POST: &str = "https://rfcampc.siat.sat.gob.mx/saml2/sp/acs/post";
    pub const LOGOUT: &str = "https://login.siat.sat.gob.mx/nidp/app/plogout";
    pub const LOGIN_FIEL: &str =
        "https://login.siat.sat.gob.mx/nidp/idff/sso?id=fiel&sid=0&option=credential&sid=0";
    pub const LOGIN_CIEC: &str =
        "https://login.siat.sat.gob.mx/nidp/idff/sso?id=mat-ptsc-totp&sid=0&option=credential&sid=0";
}

mod pstcd {
    pub const MAIN: &str = "https://pstcdypisr.clouda.sat.gob.mx/";
    pub const LOGOUT: &str = "https://pstcdypisr.clouda.sat.gob.mx/Home/LogOut";
    pub const LOGIN_FIEL: &str =
        "https://loginda.siat.sat.gob.mx/nidp/app/login?id=fiel&sid=0&option=credential&sid=0";
    pub const LOGIN_CIEC: &str =
        "https://loginda.siat.sat.gob.mx/nidp/wsfed/ep?id=ciec&sid=0&option=credential&sid=0";
}

mod ce_consulta {
    pub const MAIN: &str = "https://ceportalconsultaextprod.clouda.sat.gob.mx";
    pub const LOGOUT: &str = "https://ceportalenvioprod.clouda.sat.gob.mx/Logout.aspx?wa=wsignoutcleanup1.0&wreply=https://login.siat.sat.gob.mx/nidp/wsfed/loreply";
    pub const LOGIN_FIEL: &str =
        "https://login.siat.sat.gob.mx/nidp/wsfed/ep?id=ptsc-fiel-ciec&sid=0&option=credential&sid=0";
    pub const LOGIN_CIEC: &str = "https://login.siat.sat.gob.mx/nidp/wsfed/ep?id=anualescontribmorales&sid=0&option=credential&sid=0";
}

mod acuses {
    pub const MAIN: &str = "https://www.acuse.sat.gob.mx/REIMPRESIONINTERNET/REIMdatos.asp";
    pub const LOGOUT: &str = "https://www.acuse.sat.gob.mx/REIMPRESIONINTERNET/REIMlogout.asp";
    pub const VERIFY_PASSWORD: &str = "https://www.acuse.sat.gob.mx/_mem_bin/verifpwd.asp";
    pub const LOGIN_FIEL: &str =
        "https://www.acuse.sat.gob.mx/_mem_bin/formsloginFEA.asp?/REIMPRESIONINTERNET/REIMDEFAULT.HTM";
    pub const LOGIN_CIEC: &str =
        "https://www.acuse.sat.gob.mx/_mem_bin/FormsLogin.asp?/ReimpresionInternet/REIMDefault.htm";
    pub const DEFAULT_PAGE: &str = "/REIMPRESIONINTERNET/REIMDEFAULT.HTM";
}

/// One SAT portal described by its URLs and relay chains.
///
/// The FIEL challenge page is reached the same way on every SAT portal: open
/// the main page, post empty CIEC data, then open the FIEL login page with
/// the CIEC login page as referer.
#[derive(Debug, Clone)]
pub struct SatPortal {
    name: String,
    main_url: String,
    logout_url: String,
    login_ciec_url: String,
    login_fiel_url: String,
    ciec_submit_url: Option<String>,
    ciec_extra_fields: Vec<(String, String)>,
    fiel_relay: Vec<RelayStep>,
    logout_relay: Vec<RelayStep>,
    main_page_autosubmit: bool,
    authenticated_markers: Vec<String>,
    supports_fiel: bool,
    fiel_applet_url: String,
    ciec_rejected_marker: String,
    ciec_without_captcha_rejected_marker: String,
}

impl SatPortal {
    /// Start describing a portal
    pub fn builder(name: impl Into<String>) -> SatPortalBuilder {
        SatPortalBuilder::new(name)
    }

    /// CFDI invoice portal
    pub fn cfdi() -> Self {
        SatPortal::builder("cfdi")
            .main_url(cfdi::MAIN)
            .logout_url(cfdi::LOGOUT)
            .login_ciec_url(cfdi::LOGIN_CIEC)
            .login_fiel_url(cfdi::LOGIN_FIEL)
            .fiel_relay(vec![RelayStep::post_form(REASON_POST_MAIN_PAGE, cfdi::MAIN)])
            .main_page_autosubmit(true)
            .authenticated_marker("RFC Autenticado: {rfc}")
            .build_unchecked()
    }

    /// Electronic notifications (buzón tributario) portal
    pub fn agr() -> Self {
        SatPortal::builder("agr")
            .main_url(agr::MAIN)
            .logout_url(agr::LOGOUT)
            .login_ciec_url(agr::LOGIN_CIEC)
            .login_fiel_url(agr::LOGIN_FIEL)
            .fiel_relay(vec![
                RelayStep::get("get sso login page", agr::AFTER_FIEL),
                RelayStep::post_form("post to sso page", agr::SSO),
                RelayStep::post_form("post to login post page", agr::LOGIN_POST),
            ])
            .logout_relay(vec![
                RelayStep::post_form("post to logout post page", agr::LOGOUT_POST),
                RelayStep::post_form("post to sso page", agr::SSO),
            ])
            .authenticated_marker("Destinatario: {rfc}")
            .build_unchecked()
    }

    /// RFC registration receipts portal
    pub fn rfc_amp_c() -> Self {
        SatPortal::builder("rfc-amp-c")
            .main_url(rfc_amp_c::MAIN)
            .logout_url(rfc_amp_c::LOGOUT)
            .login_ciec_url(rfc_amp_c::LOGIN_CIEC)
            .login_fiel_url(rfc_amp_c::LOGIN_FIEL)
            .fiel_relay(vec![
                RelayStep::get(REASON_MAIN_PAGE, rfc_amp_c::MAIN),
                RelayStep::post_form("post to sso login page", rfc_amp_c::SSO),
                RelayStep::post_form("post to login post page", rfc_amp_c::LOGIN_POST),
            ])
            .authenticated_marker("Reimpresión de Acuses")
            .build_unchecked()
    }

    /// Tax returns of digital platforms portal
    pub fn pstcd_and_pisr() -> Self {
        SatPortal::builder("pstcd-pisr")
            .main_url(pstcd::MAIN)
            .logout_url(pstcd::LOGOUT)
            .login_ciec_url(pstcd::LOGIN_CIEC)
            .login_fiel_url(pstcd::LOGIN_FIEL)
            .fiel_relay(vec![RelayStep::post_form(REASON_POST_MAIN_PAGE, pstcd::MAIN)])
            .main_page_autosubmit(true)
            .authenticated_marker("RFC:")
            .authenticated_marker(RFC_PLACEHOLDER)
            .build_unchecked()
    }

    /// Electronic accounting receipts portal
    pub fn ce_consulta() -> Self {
        SatPortal::builder("ce-consulta")
            .main_url(ce_consulta::MAIN)
            .logout_url(ce_consulta::LOGOUT)
            .login_ciec_url(ce_consulta::LOGIN_CIEC)
            .login_fiel_url(ce_consulta::LOGIN_FIEL)
            .fiel_relay(vec![
                RelayStep::get(REASON_MAIN_PAGE, ce_consulta::MAIN),
                RelayStep::post_form(REASON_POST_MAIN_PAGE, ce_consulta::MAIN),
            ])
            .authenticated_marker("Consulta Acuses")
            .build_unchecked()
    }

    /// Receipts reprint portal, CIEC only
    pub fn acuses() -> Self {
        SatPortal::builder("acuses")
            .main_url(acuses::MAIN)
            .logout_url(acuses::LOGOUT)
            .login_ciec_url(acuses::LOGIN_CIEC)
            .login_fiel_url(acuses::LOGIN_FIEL)
            .ciec_submit_url(acuses::VERIFY_PASSWORD)
            .ciec_extra_field("bUsername", "")
            .ciec_extra_field("URL", acuses::DEFAULT_PAGE)
            .supports_fiel(false)
            .authenticated_marker("Usuario Autenticado:")
            .authenticated_marker(RFC_PLACEHOLDER)
            .build_unchecked()
    }

    pub fn login_ciec_url(&self) -> &str {
        &self.login_ciec_url
    }

    pub fn login_fiel_url(&self) -> &str {
        &self.login_fiel_url
    }

    pub fn fiel_relay(&self) -> &[RelayStep] {
        &self.fiel_relay
    }

    pub fn logout_relay(&self) -> &[RelayStep] {
        &self.logout_relay
    }

    pub fn authenticated_markers(&self) -> &[String] {
        &self.authenticated_markers
    }
}

#[async_trait]
impl Portal for SatPortal {
    fn name(&self) -> &str {
        &self.name
    }

    fn main_url(&self) -> &str {
        &self.main_url
    }

    fn logout_url(&self) -> &str {
        &self.logout_url
    }

    fn is_authenticated(&self, html: &str, rfc: &str) -> bool {
        !self.authenticated_markers.is_empty()
            && self
                .authenticated_markers
                .iter()
                .all(|marker| html.contains(&marker.replace(RFC_PLACEHOLDER, rfc)))
    }

    fn ciec_rejected_marker(&self) -> &str {
        &self.ciec_rejected_marker
    }

    fn ciec_without_captcha_rejected_marker(&self) -> &str {
        &self.ciec_without_captcha_rejected_marker
    }

    fn supports_fiel(&self) -> bool {
        self.supports_fiel
    }

    fn fiel_applet_url(&self) -> &str {
        &self.fiel_applet_url
    }

    async fn get_login_ciec_page(&self, gateway: &HttpGateway) -> std::result::Result<String, GatewayError> {
        gateway.get_auth_login_page(&self.login_ciec_url, "").await
    }

    async fn get_login_fiel_page(&self, gateway: &HttpGateway) -> std::result::Result<String, GatewayError> {
        // main page redirects to the password login, which accepts an empty post
        self.get_portal_main_page(gateway).await?;
        gateway
            .post_ciec_login_data(&self.login_ciec_url, &FormFields::new())
            .await?;
        gateway
            .get_auth_login_page(&self.login_fiel_url, &self.login_ciec_url)
            .await
    }

    async fn post_login_ciec(
        &self,
        gateway: &HttpGateway,
        inputs: &FormFields,
    ) -> std::result::Result<String, GatewayError> {
        let url = self.ciec_submit_url.as_deref().unwrap_or(&self.login_ciec_url);
        if self.ciec_extra_fields.is_empty() {
            return gateway.post_ciec_login_data(url, inputs).await;
        }

        let mut form = inputs.clone();
        form.extend(self.ciec_extra_fields.iter().cloned());
        gateway.post_ciec_login_data(url, &form).await
    }

    async fn post_login_fiel(
        &self,
        gateway: &HttpGateway,
        inputs: &FormFields,
    ) -> std::result::Result<String, GatewayError> {
        let html = gateway
            .post_fiel_login_data(&self.login_fiel_url, inputs)
            .await?;
        run_relay(gateway, &self.fiel_relay, html).await
    }

    async fn access_portal_main_page(
        &self,
        gateway: &HttpGateway,
    ) -> std::result::Result<String, GatewayError> {
        let html = self.get_portal_main_page(gateway).await?;
        if !self.main_page_autosubmit {
            return Ok(html);
        }

        let inputs = HtmlForm::new(&html, "form").get_form_values();
        if inputs.is_empty() {
            return Ok(html);
        }
        gateway
            .post_general(REASON_POST_MAIN_PAGE, &self.main_url, &inputs)
            .await
    }

    async fn logout(&self, gateway: &HttpGateway) -> std::result::Result<String, GatewayError> {
        let html = gateway.get_logout(&self.logout_url, &self.main_url).await?;
        if self.logout_relay.is_empty() {
            return Ok(html);
        }

        let html = run_relay(gateway, &self.logout_relay, html).await?;
        gateway.clear_cookie_jar();
        Ok(html)
    }
}

/// Builder for [`SatPortal`]
#[derive(Debug, Clone)]
pub struct SatPortalBuilder {
    portal: SatPortal,
}

impl SatPortalBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            portal: SatPortal {
                name: name.into(),
                main_url: String::new(),
                logout_url: String::new(),
                login_ciec_url: String::new(),
                login_fiel_url: String::new(),
                ciec_submit_url: None,
                ciec_extra_fields: Vec::new(),
                fiel_relay: Vec::new(),
                logout_relay: Vec::new(),
                main_page_autosubmit: false,
                authenticated_markers: Vec::new(),
                supports_fiel: true,
                fiel_applet_url: DEFAULT_FIEL_APPLET_URL.to_string(),
                ciec_rejected_marker: DEFAULT_CIEC_REJECTED_MARKER.to_string(),
                ciec_without_captcha_rejected_marker:
                    DEFAULT_CIEC_WITHOUT_CAPTCHA_REJECTED_MARKER.to_string(),
            },
        }
    }

    pub fn main_url(mut self, url: impl Into<String>) -> Self {
        self.portal.main_url = url.into();
        self
    }

    pub fn logout_url(mut self, url: impl Into<String>) -> Self {
        self.portal.logout_url = url.into();
        self
    }

    pub fn login_ciec_url(mut self, url: impl Into<String>) -> Self {
        self.portal.login_ciec_url = url.into();
        self
    }

    pub fn login_fiel_url(mut self, url: impl Into<String>) -> Self {
        self.portal.login_fiel_url = url.into();
        self
    }

    /// Post the CIEC form somewhere other than the CIEC login page
    pub fn ciec_submit_url(mut self, url: impl Into<String>) -> Self {
        self.portal.ciec_submit_url = Some(url.into());
        self
    }

    /// Field added to every CIEC login post
    pub fn ciec_extra_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.portal.ciec_extra_fields.push((name.into(), value.into()));
        self
    }

    /// Steps run on the response of the FIEL login post
    pub fn fiel_relay(mut self, steps: Vec<RelayStep>) -> Self {
        self.portal.fiel_relay = steps;
        self
    }

    /// Steps run after the logout walker
    pub fn logout_relay(mut self, steps: Vec<RelayStep>) -> Self {
        self.portal.logout_relay = steps;
        self
    }

    /// Post the main page form back to the main page when it has fields
    pub fn main_page_autosubmit(mut self, enabled: bool) -> Self {
        self.portal.main_page_autosubmit = enabled;
        self
    }

    /// Text an authenticated page must contain, `{rfc}` stands for the session RFC
    pub fn authenticated_marker(mut self, marker: impl Into<String>) -> Self {
        self.portal.authenticated_markers.push(marker.into());
        self
    }

    pub fn supports_fiel(mut self, supported: bool) -> Self {
        self.portal.supports_fiel = supported;
        self
    }

    pub fn fiel_applet_url(mut self, url: impl Into<String>) -> Self {
        self.portal.fiel_applet_url = url.into();
        self
    }

    pub fn ciec_rejected_marker(mut self, marker: impl Into<String>) -> Self {
        self.portal.ciec_rejected_marker = marker.into();
        self
    }

    pub fn ciec_without_captcha_rejected_marker(mut self, marker: impl Into<String>) -> Self {
        self.portal.ciec_without_captcha_rejected_marker = marker.into();
        self
    }

    /// Build the portal, URLs and at least one authenticated marker are required
    pub fn build(self) -> Result<SatPortal> {
        let portal = &self.portal;
        for (name, value) in [
            ("main URL", &portal.main_url),
            ("logout URL", &portal.logout_url),
            ("CIEC login URL", &portal.login_ciec_url),
        ] {
            if value.is_empty() {
                return Err(Error::config(format!("Portal {} requires a {}", portal.name, name)));
            }
        }
        if portal.supports_fiel && portal.login_fiel_url.is_empty() {
            return Err(Error::config(format!(
                "Portal {} requires a FIEL login URL",
                portal.name
            )));
        }
        if portal.authenticated_markers.is_empty() {
            return Err(Error::config(format!(
                "Portal {} requires an authenticated marker",
                portal.name
            )));
        }

        Ok(self.portal)
    }

    /// Tables above are complete by construction
    fn build_unchecked(self) -> SatPortal {
        self.portal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::http::Cookie;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTOSUBMIT: &str = r#"<form method="post"><input type="hidden" name="wa" value="wsignin1.0"></form>"#;

    fn gateway() -> HttpGateway {
        HttpGateway::with_config(GatewayConfig::for_testing()).unwrap()
    }

    fn mock_portal(server: &MockServer) -> SatPortalBuilder {
        let uri = server.uri();
        SatPortal::builder("mock")
            .main_url(format!("{}/main", uri))
            .logout_url(format!("{}/logout", uri))
            .login_ciec_url(format!("{}/ciec", uri))
            .login_fiel_url(format!("{}/fiel", uri))
            .authenticated_marker("RFC Autenticado: {rfc}")
    }

    #[test]
    fn test_builtin_tables_are_complete() {
        for portal in [
            SatPortal::cfdi(),
            SatPortal::agr(),
            SatPortal::rfc_amp_c(),
            SatPortal::pstcd_and_pisr(),
            SatPortal::ce_consulta(),
            SatPortal::acuses(),
        ] {
            let name = portal.name().to_string();
            assert!(
                SatPortalBuilder { portal }.build().is_ok(),
                "{} table is incomplete",
                name
            );
        }
    }

    #[test]
    fn test_authenticated_markers() {
        let cfdi = SatPortal::cfdi();
        assert!(cfdi.is_authenticated("<b>RFC Autenticado: AAA010101AAA</b>", "AAA010101AAA"));
        assert!(!cfdi.is_authenticated("<b>RFC Autenticado: BBB010101BBB</b>", "AAA010101AAA"));

        let pstcd = SatPortal::pstcd_and_pisr();
        assert!(pstcd.is_authenticated("RFC: <span>AAA010101AAA</span>", "AAA010101AAA"));
        assert!(!pstcd.is_authenticated("<span>AAA010101AAA</span>", "AAA010101AAA"));

        assert!(SatPortal::ce_consulta().is_authenticated("Consulta Acuses", "ANY"));
        assert!(SatPortal::rfc_amp_c().is_authenticated("<h1>Reimpresión de Acuses</h1>", "ANY"));
    }

    #[test]
    fn test_defaults_and_capabilities() {
        let cfdi = SatPortal::cfdi();
        assert_eq!(cfdi.ciec_rejected_marker(), "Ecom_User_ID");
        assert_eq!(cfdi.ciec_without_captcha_rejected_marker(), "frmLog");
        assert_eq!(cfdi.fiel_applet_url(), DEFAULT_FIEL_APPLET_URL);
        assert!(cfdi.supports_fiel());
        assert!(!SatPortal::acuses().supports_fiel());
        assert_eq!(SatPortal::agr().logout_relay().len(), 2);
    }

    #[test]
    fn test_build_requires_urls_and_markers() {
        let err = SatPortal::builder("broken").build().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("main URL")));

        let err = SatPortal::builder("no-markers")
            .main_url("https://example.test/")
            .logout_url("https://example.test/logout")
            .login_ciec_url("https://example.test/ciec")
            .login_fiel_url("https://example.test/fiel")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("marker")));

        assert!(SatPortal::builder("ciec-only")
            .main_url("https://example.test/")
            .logout_url("https://example.test/logout")
            .login_ciec_url("https://example.test/ciec")
            .supports_fiel(false)
            .authenticated_marker("{rfc}")
            .build()
            .is_ok());
    }

    #[tokio::test]
    async fn test_fiel_page_is_reached_through_ciec_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/main"))
            .respond_with(ResponseTemplate::new(200).set_body_string("main"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ciec"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ciec"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fiel"))
            .and(header("referer", format!("{}/ciec", server.uri()).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("challenge"))
            .expect(1)
            .mount(&server)
            .await;

        let portal = mock_portal(&server).build().unwrap();
        let html = portal.get_login_fiel_page(&gateway()).await.unwrap();
        assert_eq!(html, "challenge");
    }

    #[tokio::test]
    async fn test_ciec_post_adds_extra_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .and(body_string_contains("bUsername="))
            .and(body_string_contains("Ecom_User_ID=AAA010101AAA"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let portal = mock_portal(&server)
            .ciec_submit_url(format!("{}/verify", server.uri()))
            .ciec_extra_field("bUsername", "")
            .build()
            .unwrap();
        let mut inputs = FormFields::new();
        inputs.insert("Ecom_User_ID".into(), "AAA010101AAA".into());

        assert_eq!(portal.post_login_ciec(&gateway(), &inputs).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_main_page_autosubmit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/main"))
            .respond_with(ResponseTemplate::new(200).set_body_string(AUTOSUBMIT))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/main"))
            .and(body_string_contains("wa=wsignin1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("RFC Autenticado: X"))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway();
        let plain = mock_portal(&server).build().unwrap();
        assert_eq!(plain.access_portal_main_page(&gateway).await.unwrap(), AUTOSUBMIT);

        let autosubmit = mock_portal(&server).main_page_autosubmit(true).build().unwrap();
        assert_eq!(
            autosubmit.access_portal_main_page(&gateway).await.unwrap(),
            "RFC Autenticado: X"
        );
    }

    #[tokio::test]
    async fn test_logout_relay_runs_after_walker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_string(AUTOSUBMIT))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/slo"))
            .and(body_string_contains("wa=wsignin1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", "slo=1; Path=/")
                    .set_body_string("signed out"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let portal = mock_portal(&server)
            .logout_relay(vec![RelayStep::post_form(
                "post to logout post page",
                format!("{}/slo", server.uri()),
            )])
            .build()
            .unwrap();
        let gateway = gateway();
        gateway
            .cookie_jar()
            .add(Cookie::new("sid", "1").domain("127.0.0.1"));

        assert_eq!(portal.logout(&gateway).await.unwrap(), "signed out");
        assert!(gateway.is_cookie_jar_empty());
    }
}
