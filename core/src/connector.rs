//! Request dispatch.
//!
//! # Design
//! A `Connector` owns everything a service instance shares between calls:
//! the base URL, the authenticator, default headers and the transport. All
//! of it is read-only after construction except the IAM token cache.
//!
//! `Connector::dispatch` checks what can be checked synchronously (a usable
//! authenticator, a Tokio runtime to run on), then moves the request onto the
//! blocking pool and returns a `Pending` future immediately. The task makes
//! one attempt: authenticate, send, decode. Its output is exactly one
//! `Completion`. Dropping the `Pending` does not cancel the request.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};
use url::Url;

use crate::auth::Authenticator;
use crate::error::{WatsonError, WatsonResult};
use crate::request::Request;
use crate::response::{decode, CustomData, DetailedResponse, ResponseKind};
use crate::transport::Transport;

/// The single terminal outcome of a dispatched call.
///
/// `response` is present whenever the service answered, even if `error` is
/// also set (non-2xx status or undecodable body). Check `error` before
/// trusting `response.result`.
#[derive(Debug)]
pub struct Completion<T> {
    pub response: Option<DetailedResponse<T>>,
    pub error: Option<WatsonError>,
    pub custom_data: CustomData,
}

impl<T> Completion<T> {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> WatsonResult<DetailedResponse<T>> {
        match (self.response, self.error) {
            (_, Some(error)) => Err(error),
            (Some(response), None) => Ok(response),
            (None, None) => Err(WatsonError::Transport("no response received".to_string())),
        }
    }

    fn failed(error: WatsonError, custom_data: CustomData) -> Self {
        Self {
            response: None,
            error: Some(error),
            custom_data,
        }
    }
}

/// Future for a dispatched call. Resolves exactly once.
pub struct Pending<T> {
    handle: JoinHandle<Completion<T>>,
    runtime: Handle,
}

impl<T: Send + 'static> Pending<T> {
    /// Deliver the completion to `callback` instead of awaiting it.
    pub fn on_complete<F>(self, callback: F)
    where
        F: FnOnce(Completion<T>) + Send + 'static,
    {
        let runtime = self.runtime.clone();
        runtime.spawn(async move { callback(self.await) });
    }
}

impl<T> Future for Pending<T> {
    type Output = Completion<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(completion)) => Poll::Ready(completion),
            Poll::Ready(Err(e)) => {
                error!(error = %e, "dispatch task failed");
                Poll::Ready(Completion::failed(
                    WatsonError::Transport(format!("dispatch task failed: {e}")),
                    CustomData::new(),
                ))
            }
        }
    }
}

/// Per-call metadata that does not affect the request itself.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub operation: &'static str,
    pub response: ResponseKind,
    pub custom_data: CustomData,
}

pub struct Connector {
    base_url: Url,
    authenticator: Option<Arc<Authenticator>>,
    default_headers: Vec<(String, String)>,
    transport: Arc<dyn Transport>,
}

impl Connector {
    /// Fails if `base_url` does not parse or cannot be a base.
    pub fn new(
        base_url: &str,
        authenticator: Option<Authenticator>,
        default_headers: Vec<(String, String)>,
        transport: Arc<dyn Transport>,
    ) -> WatsonResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            authenticator: authenticator.map(Arc::new),
            default_headers,
            transport,
        })
    }

    /// A connector for `base_url` sharing this one's authenticator (and its
    /// cached IAM token), default headers and transport.
    pub fn with_base_url(&self, base_url: &str) -> WatsonResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            authenticator: self.authenticator.clone(),
            default_headers: self.default_headers.clone(),
            transport: Arc::clone(&self.transport),
        })
    }

    /// A connector sending through `transport`, sharing everything else.
    pub fn with_transport(&self, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            authenticator: self.authenticator.clone(),
            default_headers: self.default_headers.clone(),
            transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticator.is_some()
    }

    /// Start one call. `Err` means nothing was sent; `Ok` means the call was
    /// handed to the runtime and will complete exactly once.
    pub fn dispatch<T>(&self, request: Request, dispatch: Dispatch) -> WatsonResult<Pending<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let authenticator = self.authenticator.clone().ok_or_else(|| {
            WatsonError::Configuration(
                "no credentials configured: set an API key, username/password or bearer token"
                    .to_string(),
            )
        })?;
        let runtime = Handle::try_current().map_err(|_| {
            WatsonError::Configuration("dispatch requires a Tokio runtime".to_string())
        })?;

        let base_url = self.base_url.clone();
        let default_headers = self.default_headers.clone();
        let transport = Arc::clone(&self.transport);
        let Dispatch {
            operation,
            response: kind,
            mut custom_data,
        } = dispatch;

        let handle = runtime.spawn_blocking(move || {
            let authorization = match authenticator.authorization(transport.as_ref()) {
                Ok(value) => value,
                Err(e) => {
                    error!(operation, error = %e, "authentication failed");
                    return Completion::failed(e, custom_data);
                }
            };
            let http_request =
                match request.resolve(&base_url, &default_headers, Some(&authorization)) {
                    Ok(http_request) => http_request,
                    Err(e) => return Completion::failed(e, custom_data),
                };
            debug!(operation, method = %http_request.method, url = %http_request.url, "dispatching");

            let http_response = match transport.execute(&http_request) {
                Ok(http_response) => http_response,
                Err(e) => {
                    error!(operation, error = %e, "request failed");
                    return Completion::failed(e, custom_data);
                }
            };
            debug!(operation, status = http_response.status, "response received");

            let (response, error) = decode::<T>(kind, http_response, &mut custom_data);
            Completion {
                response: Some(response),
                error,
                custom_data,
            }
        });

        Ok(Pending {
            handle,
            runtime,
        })
    }
}

fn parse_base_url(base_url: &str) -> WatsonResult<Url> {
    let parsed = Url::parse(base_url)
        .map_err(|e| WatsonError::Configuration(format!("invalid service URL `{base_url}`: {e}")))?;
    if parsed.cannot_be_a_base() {
        return Err(WatsonError::Configuration(format!(
            "service URL `{base_url}` cannot be a base"
        )));
    }
    Ok(parsed)
}
