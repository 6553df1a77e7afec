// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Gateway configuration

use std::time::Duration;

use crate::http::DEFAULT_USER_AGENT;

/// Default cap on meta refresh hops followed during logout
pub const DEFAULT_MAX_LOGOUT_HOPS: usize = 20;

/// HTTP gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// User agent string
    pub user_agent: String,
    /// Total timeout per request
    pub timeout: Duration,
    /// Timeout to establish the connection
    pub connect_timeout: Duration,
    /// Maximum server redirects followed per request
    pub max_redirects: usize,
    /// Maximum meta refresh hops followed on logout
    pub max_logout_hops: usize,
    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(15),
            max_redirects: 10,
            max_logout_hops: DEFAULT_MAX_LOGOUT_HOPS,
            accept_invalid_certs: false,
            proxy: None,
        }
    }
}

impl GatewayConfig {
    /// Create a new gateway config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set maximum redirects per request
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set maximum logout hops, at least one
    pub fn max_logout_hops(mut self, max: usize) -> Self {
        self.max_logout_hops = max.max(1);
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Short timeouts, for tests against local servers
    pub fn for_testing() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Default::default()
        }
    }
}
