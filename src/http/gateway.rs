// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP gateway: every page fetch and form post of a portal session goes through here

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use url::{form_urlencoded, Url};

use super::cookie::CookieJar;
use super::headers::{host_of, names, HeaderSet, Headers};
use super::request::RequestContext;
use super::response::RawResponse;
use crate::config::GatewayConfig;
use crate::error::{Error, GatewayError, Result};
use crate::html::MetaRefresh;

/// Cookie-bearing HTTP gateway.
///
/// Cloning is cheap and shares the cookie jar and the effective URI.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
    cookie_jar: CookieJar,
    headers: Headers,
    /// Where the last request landed after redirects, empty before the first one
    effective_uri: Arc<RwLock<String>>,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("config", &self.config)
            .field("cookies", &self.cookie_jar.len())
            .field("effective_uri", &*self.effective_uri.read())
            .finish()
    }
}

impl HttpGateway {
    /// Create a gateway with default configuration and an empty jar
    pub fn new() -> Result<Self> {
        Self::with_config(GatewayConfig::default())
    }

    /// Create a gateway with custom configuration and an empty jar
    pub fn with_config(config: GatewayConfig) -> Result<Self> {
        Self::with_cookie_jar(config, CookieJar::new())
    }

    /// Create a gateway over an existing jar, e.g. one restored from disk
    pub fn with_cookie_jar(config: GatewayConfig, cookie_jar: CookieJar) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .cookie_provider(Arc::new(cookie_jar.clone()));

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            headers: Headers::new(config.user_agent.clone()),
            config,
            cookie_jar,
            effective_uri: Arc::new(RwLock::new(String::new())),
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Check if no cookie has been received yet (or the jar was cleared)
    pub fn is_cookie_jar_empty(&self) -> bool {
        self.cookie_jar.is_empty()
    }

    /// Drop every cookie
    pub fn clear_cookie_jar(&self) {
        self.cookie_jar.clear();
    }

    /// Final URL of the last request, empty before the first one
    pub fn effective_uri(&self) -> String {
        self.effective_uri.read().clone()
    }

    fn set_effective_uri(&self, uri: &str) {
        *self.effective_uri.write() = uri.to_string();
    }

    /// Header builder used by this gateway
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// GET a page
    pub async fn get(
        &self,
        reason: &str,
        url: &str,
        referer: &str,
    ) -> std::result::Result<String, GatewayError> {
        self.send(Method::GET, reason, url, self.headers.get(referer), &HashMap::new())
            .await
    }

    /// GET a login page
    pub async fn get_auth_login_page(
        &self,
        url: &str,
        referer: &str,
    ) -> std::result::Result<String, GatewayError> {
        self.get("get login page", url, referer).await
    }

    /// POST a form with explicit headers
    pub async fn post(
        &self,
        reason: &str,
        url: &str,
        headers: HeaderSet,
        form: &HashMap<String, String>,
    ) -> std::result::Result<String, GatewayError> {
        self.send(Method::POST, reason, url, headers, form).await
    }

    /// POST a form with the default form headers and neither host nor referer
    pub async fn post_general(
        &self,
        reason: &str,
        url: &str,
        form: &HashMap<String, String>,
    ) -> std::result::Result<String, GatewayError> {
        self.post(reason, url, self.headers.post("", ""), form).await
    }

    /// POST the CIEC login data; the login URL is also the referer
    pub async fn post_ciec_login_data(
        &self,
        login_url: &str,
        form: &HashMap<String, String>,
    ) -> std::result::Result<String, GatewayError> {
        let headers = self.headers.post(&host_of(login_url), login_url);
        self.post("post ciec login data", login_url, headers, form).await
    }

    /// POST the FIEL challenge answer; the login URL is also the referer
    pub async fn post_fiel_login_data(
        &self,
        login_url: &str,
        form: &HashMap<String, String>,
    ) -> std::result::Result<String, GatewayError> {
        let headers = self.headers.post(&host_of(login_url), login_url);
        self.post("post fiel login data", login_url, headers, form).await
    }

    /// POST as an XMLHttpRequest to `url_referer`
    pub async fn post_ajax(
        &self,
        url_host: &str,
        url_referer: &str,
        form: &HashMap<String, String>,
    ) -> std::result::Result<String, GatewayError> {
        let headers = self.headers.post_ajax(&host_of(url_host), url_referer);
        self.post("post ajax", url_referer, headers, form).await
    }

    /// Follow the logout page and its chain of meta refresh pages, then clear the jar.
    ///
    /// Transport failures along the chain are ignored: the walk stops where it
    /// could not continue. A chain longer than `max_logout_hops` fails with
    /// [`GatewayError::LogoutLoop`] (the jar is cleared anyway).
    pub async fn get_logout(
        &self,
        destination: &str,
        referer: &str,
    ) -> std::result::Result<String, GatewayError> {
        let mut destination = destination.to_string();
        let mut referer = referer.to_string();
        let mut hops = 0;

        let html = loop {
            let html = match self.get("logout", &destination, &referer).await {
                Ok(html) => html,
                Err(err) => {
                    tracing::warn!(url = %destination, error = %err, "Logout request failed");
                    String::new()
                }
            };

            referer = self.effective_uri();
            let next = MetaRefresh::obtain_url(&html, &referer);
            if next.is_empty() || same_url(&next, &referer) {
                break html;
            }

            if hops == self.config.max_logout_hops {
                self.clear_cookie_jar();
                return Err(GatewayError::LogoutLoop {
                    destination: next,
                    hops,
                });
            }

            tracing::debug!(from = %referer, to = %next, "Following logout refresh");
            hops += 1;
            destination = next;
        };

        self.clear_cookie_jar();
        tracing::info!(hops, "Logged out");
        Ok(html)
    }

    async fn send(
        &self,
        method: Method,
        reason: &str,
        url: &str,
        headers: HeaderSet,
        form: &HashMap<String, String>,
    ) -> std::result::Result<String, GatewayError> {
        let context = RequestContext::new(method.clone(), url, &headers, form);
        self.set_effective_uri(url);

        tracing::debug!(method = %method, url = %url, reason = %reason, "Sending request");

        let mut builder = self.client.request(method.clone(), url);
        for (name, value) in &headers {
            // Host is derived by the transport on every redirect hop
            if name.eq_ignore_ascii_case(names::HOST) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if method == Method::POST {
            let body = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(form.iter())
                .finish();
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| GatewayError::Client {
                reason: reason.to_string(),
                context: context.clone(),
                status: None,
                response: None,
                body: None,
                source,
            })?;

        self.set_effective_uri(response.url().as_str());
        let status = response.status();

        let raw = RawResponse::new(status, response.url(), response.headers());

        if let Err(source) = response.error_for_status_ref() {
            tracing::debug!(url = %raw.url, status = status.as_u16(), "Error status");
            let body = response.text().await.ok();
            return Err(GatewayError::Client {
                reason: reason.to_string(),
                context,
                status: Some(status.as_u16()),
                response: Some(raw),
                body,
                source,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| GatewayError::Client {
                reason: reason.to_string(),
                context: context.clone(),
                status: Some(status.as_u16()),
                response: Some(raw.clone()),
                body: None,
                source,
            })?;

        if body.is_empty() {
            return Err(GatewayError::Response {
                reason: reason.to_string(),
                context,
                response: raw,
            });
        }

        Ok(body)
    }
}

/// Compare two URLs in normalized form, falling back to the raw text
fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
