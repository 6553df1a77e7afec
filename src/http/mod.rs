// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for sat-auth
//!
//! A reqwest client wrapped in a gateway that tracks cookies (including those
//! set along redirect chains), remembers where the last request landed, and
//! turns every failure into a typed error carrying the request.

mod cookie;
mod gateway;
mod headers;
mod request;
mod response;

pub use cookie::{Cookie, CookieJar};
pub use gateway::HttpGateway;
pub use headers::{
    host_of, names, HeaderSet, Headers, CHROME_USER_AGENT, DEFAULT_USER_AGENT,
    FIREFOX_USER_AGENT,
};
pub use request::RequestContext;
pub use response::RawResponse;
