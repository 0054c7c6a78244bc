//! The I/O boundary.
//!
//! Everything above this module works on plain `HttpRequest` /
//! `HttpResponse` data. A `Transport` executes one request synchronously and
//! returns the response as data, whatever its status; only failures to
//! obtain a response at all are errors. The connector runs transports on
//! Tokio's blocking pool, so implementations may block freely.

use std::time::Duration;

use tracing::debug;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::error::{WatsonError, WatsonResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> WatsonResult<HttpResponse>;
}

/// Blocking HTTP transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Disables ureq's status-code-as-error behavior so 4xx/5xx responses are
    /// returned as data and interpreted by the decoder.
    pub fn new(disable_ssl_verification: bool, timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(disable_ssl_verification)
                    .build(),
            )
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(false, None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> WatsonResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.url), &request.headers).call(),
            HttpMethod::Delete => {
                with_headers(self.agent.delete(&request.url), &request.headers).call()
            }
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&request.url), &request.headers);
                match body {
                    Some(body) => builder.send(body),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(&request.url), &request.headers);
                match body {
                    Some(body) => builder.send(body),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| WatsonError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| WatsonError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
