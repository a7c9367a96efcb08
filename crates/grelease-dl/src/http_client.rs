use std::time::Duration;

use tracing::trace;
use ureq::{
    http::{header::LINK, HeaderMap},
    Agent, Proxy, RequestBuilder,
};

use crate::{error::FetchError, traits::Transport};

pub const API_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
pub const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound for one response body. A full page of asset-heavy releases
/// can exceed ureq's 10 MB default.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_version: String,
    pub accept: String,
    pub user_agent: Option<String>,
    pub headers: Option<HeaderMap>,
    pub proxy: Option<Proxy>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    /// Creates a ClientConfig pointing at the public GitHub REST API.
    ///
    /// The default timeout is ten seconds; there is no way to build a config
    /// without one.
    ///
    /// # Examples
    ///
    /// ```
    /// use grelease_dl::http_client::ClientConfig;
    ///
    /// let cfg = ClientConfig::default();
    /// assert_eq!(cfg.api_url, "https://api.github.com");
    /// assert_eq!(cfg.timeout.as_secs(), 10);
    /// assert!(cfg.proxy.is_none());
    /// ```
    fn default() -> Self {
        Self {
            api_url: API_URL.into(),
            api_version: API_VERSION.into(),
            accept: ACCEPT_GITHUB_JSON.into(),
            user_agent: Some(concat!("grelease/", env!("CARGO_PKG_VERSION")).into()),
            headers: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Builds an HTTP `Agent` configured from this `ClientConfig`.
    ///
    /// The agent carries the global timeout, the proxy and the user agent.
    /// Non-success statuses are handed back as responses so callers can
    /// report the status text together with the request URL.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder()
            .proxy(self.proxy.clone())
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

/// Status, pagination header and raw body of one GET.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub link: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// [`Transport`] backed by a `ureq` agent built once from a [`ClientConfig`].
pub struct UreqTransport {
    agent: Agent,
    headers: Option<HeaderMap>,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            agent: config.build(),
            headers: config.headers.clone(),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut req = apply_headers(self.agent.get(url), &self.headers);
        for (key, value) in headers {
            req = req.header(*key, *value);
        }

        let mut resp = req.call()?;
        let status = resp.status();
        let link = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        trace!("{} {} link={:?}", status.as_u16(), url, link);

        let body = resp
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_vec()?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            link,
            body,
        })
    }
}

/// Apply headers from an optional `HeaderMap` to a `RequestBuilder`.
fn apply_headers<B>(mut req: RequestBuilder<B>, headers: &Option<HeaderMap>) -> RequestBuilder<B> {
    if let Some(headers) = headers {
        for (key, value) in headers.iter() {
            req = req.header(key, value);
        }
    }
    req
}
