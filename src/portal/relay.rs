// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Relay chains: the GET / auto-submit POST hops a portal needs after a login
//! or logout request, expressed as data

use crate::error::GatewayError;
use crate::html::HtmlForm;
use crate::http::HttpGateway;

/// One hop of a relay chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayStep {
    /// GET `url`, its body becomes the current page
    Get { reason: String, url: String },

    /// POST the `form` fields of the current page to `url`
    PostForm {
        reason: String,
        url: String,
        /// When set and missing from the current page the chain stops here
        required_marker: Option<String>,
    },
}

impl RelayStep {
    pub fn get(reason: impl Into<String>, url: impl Into<String>) -> Self {
        RelayStep::Get {
            reason: reason.into(),
            url: url.into(),
        }
    }

    pub fn post_form(reason: impl Into<String>, url: impl Into<String>) -> Self {
        RelayStep::PostForm {
            reason: reason.into(),
            url: url.into(),
            required_marker: None,
        }
    }

    /// Only post when the current page contains `marker`
    pub fn requires(self, marker: impl Into<String>) -> Self {
        match self {
            RelayStep::PostForm { reason, url, .. } => RelayStep::PostForm {
                reason,
                url,
                required_marker: Some(marker.into()),
            },
            step => step,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            RelayStep::Get { reason, .. } | RelayStep::PostForm { reason, .. } => reason,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            RelayStep::Get { url, .. } | RelayStep::PostForm { url, .. } => url,
        }
    }
}

/// Run `steps` starting from `page` and return the last page reached
pub async fn run_relay(
    gateway: &HttpGateway,
    steps: &[RelayStep],
    page: String,
) -> Result<String, GatewayError> {
    let mut page = page;

    for step in steps {
        page = match step {
            RelayStep::Get { reason, url } => gateway.get(reason, url, "").await?,
            RelayStep::PostForm {
                reason,
                url,
                required_marker,
            } => {
                if let Some(marker) = required_marker {
                    if !page.contains(marker.as_str()) {
                        tracing::debug!(step = %reason, marker = %marker, "Relay stopped early");
                        return Ok(page);
                    }
                }
                let fields = HtmlForm::new(&page, "form").get_form_values();
                gateway.post_general(reason, url, &fields).await?
            }
        };
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTOSUBMIT: &str = r#"<html><body><form method="post">
        <input type="hidden" name="wa" value="wsignin1.0">
        <input type="hidden" name="wresult" value="token">
        </form></body></html>"#;

    fn gateway() -> HttpGateway {
        HttpGateway::with_config(GatewayConfig::for_testing()).unwrap()
    }

    #[test]
    fn test_requires_only_applies_to_posts() {
        let get = RelayStep::get("get page", "https://example.test/").requires("x");
        assert_eq!(get, RelayStep::get("get page", "https://example.test/"));

        let post = RelayStep::post_form("post page", "https://example.test/").requires("SAML");
        assert!(matches!(
            post,
            RelayStep::PostForm { required_marker: Some(ref m), .. } if m == "SAML"
        ));
        assert_eq!(post.reason(), "post page");
        assert_eq!(post.url(), "https://example.test/");
    }

    #[tokio::test]
    async fn test_relay_posts_form_of_previous_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/after"))
            .respond_with(ResponseTemplate::new(200).set_body_string(AUTOSUBMIT))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sso"))
            .and(body_string_contains("wresult=token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>done</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let steps = vec![
            RelayStep::get("get after page", format!("{}/after", server.uri())),
            RelayStep::post_form("post to sso page", format!("{}/sso", server.uri())),
        ];
        let page = run_relay(&gateway(), &steps, String::new()).await.unwrap();

        assert_eq!(page, "<html>done</html>");
    }

    #[tokio::test]
    async fn test_relay_stops_when_marker_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("unexpected"))
            .expect(0)
            .mount(&server)
            .await;

        let steps = vec![RelayStep::post_form("post to sso page", format!("{}/sso", server.uri()))
            .requires("SAMLResponse")];
        let page = run_relay(&gateway(), &steps, AUTOSUBMIT.to_string())
            .await
            .unwrap();

        assert_eq!(page, AUTOSUBMIT);
    }

    #[tokio::test]
    async fn test_relay_propagates_gateway_errors() {
        let steps = vec![RelayStep::get("get sso login page", "http://127.0.0.1:1/after")];
        let err = run_relay(&gateway(), &steps, String::new()).await.unwrap_err();

        assert_eq!(err.request_context().unwrap().url, "http://127.0.0.1:1/after");
    }
}
