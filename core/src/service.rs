//! Service façade.
//!
//! # Design
//! A `Service` is one configured Watson service instance: its identity, the
//! pinned API version and a `Connector`. `Service::invoke` is the single
//! generic call path for every operation descriptor: validate and build the
//! request synchronously, attach the version and SDK headers, dispatch.
//! Argument and configuration errors come back as `Err` with nothing sent;
//! `Ok` only means the call was dispatched.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Authenticator;
use crate::config::ServiceConfig;
use crate::connector::{Connector, Dispatch, Pending};
use crate::error::{WatsonError, WatsonResult};
use crate::operation::{Arguments, Operation};
use crate::response::CustomData;
use crate::transport::{Transport, UreqTransport};

pub const USER_AGENT: &str = concat!("watson-core-rust/", env!("CARGO_PKG_VERSION"));
pub const ANALYTICS_HEADER: &str = "X-IBMCloud-SDK-Analytics";

/// Static identity of a Watson service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Snake-case name, also the environment-variable prefix source.
    pub name: &'static str,
    /// API major version used in the analytics header, e.g. `v3`.
    pub api_version: &'static str,
    pub default_url: &'static str,
    /// Whether every request needs the `version=YYYY-MM-DD` query parameter.
    pub versioned: bool,
}

/// Caller-supplied, call-scoped extras: custom headers and the custom data
/// side channel.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub headers: Vec<(String, String)>,
    pub custom_data: CustomData,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_custom_data(mut self, custom_data: CustomData) -> Self {
        self.custom_data = custom_data;
        self
    }
}

pub struct Service {
    info: ServiceInfo,
    version: Option<String>,
    config: ServiceConfig,
    /// Whether the connector's transport is the `ureq` transport this service
    /// built itself.
    owns_transport: bool,
    connector: Arc<Connector>,
}

impl Service {
    /// Build a service that talks HTTP through `ureq`.
    pub fn new(info: ServiceInfo, version: Option<&str>, config: ServiceConfig) -> WatsonResult<Self> {
        let transport = Arc::new(UreqTransport::new(config.disable_ssl_verification, config.timeout));
        Self::build(info, version, config, transport, true)
    }

    /// Build a service from `<SERVICE>_*` environment variables and the
    /// credentials file.
    pub fn from_env(info: ServiceInfo, version: Option<&str>) -> WatsonResult<Self> {
        Self::new(info, version, ServiceConfig::from_env(info.name)?)
    }

    /// Build a service over a caller-provided transport.
    ///
    /// Missing credentials are not an error here; every call fails instead.
    pub fn with_transport(
        info: ServiceInfo,
        version: Option<&str>,
        config: ServiceConfig,
        transport: Arc<dyn Transport>,
    ) -> WatsonResult<Self> {
        Self::build(info, version, config, transport, false)
    }

    fn build(
        info: ServiceInfo,
        version: Option<&str>,
        config: ServiceConfig,
        transport: Arc<dyn Transport>,
        owns_transport: bool,
    ) -> WatsonResult<Self> {
        let version = version.filter(|v| !v.is_empty()).map(str::to_string);
        if info.versioned && version.is_none() {
            return Err(WatsonError::Configuration(format!(
                "{} requires a version date (YYYY-MM-DD)",
                info.name
            )));
        }
        let connector = Arc::new(build_connector(&info, &config, transport)?);
        Ok(Self {
            info,
            version,
            config,
            owns_transport,
            connector,
        })
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn url(&self) -> &str {
        self.connector.base_url().as_str()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Point later calls at a different service URL. In-flight calls keep the
    /// old one. The authenticator and its cached IAM token carry over.
    pub fn set_url(&mut self, url: impl Into<String>) -> WatsonResult<()> {
        let url = url.into();
        self.connector = Arc::new(self.connector.with_base_url(&url)?);
        self.config.url = Some(url);
        Ok(())
    }

    /// Toggle TLS certificate verification for later calls by rebuilding the
    /// default `ureq` transport. A transport passed to `with_transport` owns
    /// its TLS settings, so toggling is a configuration error there.
    pub fn set_disable_ssl_verification(&mut self, disable: bool) -> WatsonResult<()> {
        if !self.owns_transport {
            return Err(WatsonError::Configuration(
                "TLS verification is controlled by the caller-provided transport".to_string(),
            ));
        }
        let transport: Arc<dyn Transport> = Arc::new(UreqTransport::new(disable, self.config.timeout));
        self.connector = Arc::new(self.connector.with_transport(transport));
        self.config.disable_ssl_verification = disable;
        Ok(())
    }

    /// Run `operation` with `args`.
    pub fn invoke<T>(
        &self,
        operation: &Operation,
        args: &Arguments,
        context: RequestContext,
    ) -> WatsonResult<Pending<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut request = operation.build_request(args)?;
        if let Some(version) = &self.version {
            request.prepend_query("version", version.as_str());
        }
        request.set_header(ANALYTICS_HEADER, &self.analytics(operation));
        for (name, value) in &context.headers {
            request.set_header(name, value);
        }
        debug!(
            service = self.info.name,
            operation = operation.name,
            path = %request.path(),
            "invoking operation"
        );
        self.connector.dispatch(
            request,
            Dispatch {
                operation: operation.name,
                response: operation.response,
                custom_data: context.custom_data,
            },
        )
    }

    fn analytics(&self, operation: &Operation) -> String {
        format!(
            "service_name={};service_version={};operation_id={}",
            self.info.name, self.info.api_version, operation.name
        )
    }
}

fn build_connector(
    info: &ServiceInfo,
    config: &ServiceConfig,
    transport: Arc<dyn Transport>,
) -> WatsonResult<Connector> {
    let authenticator = Authenticator::from_credentials(&config.credentials)?;
    let url = config.url.as_deref().unwrap_or(info.default_url);
    let mut headers = vec![("User-Agent".to_string(), USER_AGENT.to_string())];
    headers.extend(config.default_headers.iter().cloned());
    Connector::new(url, authenticator, headers, transport)
}
