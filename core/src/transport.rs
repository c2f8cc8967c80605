//! Blocking `Transport` backed by a `ureq` agent.
//!
//! The agent is configured not to treat 4xx/5xx as errors, so every status
//! comes back as an `HttpResponse` and the adapter decides what it means.
//! Bodies are read without ureq's default size cap unless a limit is
//! configured.

use std::time::Duration;

use ureq::{Agent, RequestBuilder};

use crate::config::AdapterConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    base_url: String,
    max_body_bytes: u64,
}

impl UreqTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_body_bytes: u64::MAX,
        }
    }

    /// Cap response bodies at `limit` bytes; larger bodies are a transport error.
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn from_config(config: &AdapterConfig) -> Self {
        let transport = Self::new(&config.base_url, config.timeout_secs.map(Duration::from_secs));
        match config.max_body_bytes {
            Some(limit) => transport.with_body_limit(limit),
            None => transport,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Apply query pairs and headers to a builder of either body kind.
fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (key, value) in request.query.pairs() {
        builder = builder.query(key, value);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.url(&request.path);
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => decorate(self.agent.get(&url), request).call(),
            HttpMethod::Delete => decorate(self.agent.delete(&url), request).call(),
            HttpMethod::Post => {
                let builder = decorate(self.agent.post(&url), request);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = decorate(self.agent.put(&url), request);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_string()
            .map_err(|e| ApiError::Transport(format!("reading body of HTTP {status} response: {e}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
