//! HTTP transport behind the tracker client.
//!
//! The client builds a [`PreparedCall`] and hands it to a [`Transport`]; the
//! production implementation sends it with `reqwest`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tvs_protocol::Method;

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const BODY_EXCERPT_LEN: usize = 200;

/// A fully keyed request, ready to be sent.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedCall {
    pub method: Method,
    pub endpoint: String,
    /// Query string pairs; always carries `apikey` and `service`.
    pub query: Vec<(String, String)>,
    /// Form body pairs, only used by POST.
    pub form: Vec<(String, String)>,
}

impl PreparedCall {
    /// Value of the first query or form parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .chain(self.form.iter())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// URL with an encoded query string and the API key masked, for logging.
    pub fn redacted_url(&self) -> String {
        let query = self
            .query
            .iter()
            .map(|(k, v)| {
                let value = if k == "apikey" {
                    "[REDACTED]".into()
                } else {
                    urlencoding::encode(v)
                };
                format!("{}={}", k, value)
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.endpoint, query)
    }
}

// Custom Debug implementation to avoid exposing the API key
impl std::fmt::Debug for PreparedCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedCall")
            .field("method", &self.method)
            .field("url", &self.redacted_url())
            .field("form", &self.form)
            .finish()
    }
}

/// Executes prepared calls and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, call: &PreparedCall) -> Result<String>;
}

/// `reqwest` backed transport.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_secs(REQUEST_TIMEOUT_SECS), None)
    }

    /// Create a transport with a custom timeout and optional User-Agent.
    pub fn with_options(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, call: &PreparedCall) -> Result<String> {
        let request = match call.method {
            Method::Get => self.client.get(&call.endpoint).query(&call.query),
            Method::Post => self
                .client
                .post(&call.endpoint)
                .query(&call.query)
                .form(&call.form),
        };

        let response = request.send().await.map_err(|e| {
            AppError::Transport(format!("{} {} failed: {}", call.method, call.endpoint, e))
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::RemoteService {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        Ok(body)
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
