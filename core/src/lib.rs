//! Client core for the IBM Watson cloud services.
//!
//! # Overview
//! Every Watson endpoint is a `const Operation` descriptor in `services`.
//! `Service::invoke` validates caller `Arguments` against the descriptor,
//! lays them out into a `Request`, attaches version, SDK and custom headers,
//! and hands the request to a `Connector`. The connector authenticates
//! (Basic, bearer token or IAM), sends the request over a `Transport` and
//! decodes the answer into a `DetailedResponse`. The outcome arrives exactly
//! once as a `Completion`, either by awaiting the returned `Pending` or
//! through `Pending::on_complete`.
//!
//! # Design
//! - Request building, header merging and response decoding are plain data
//!   transformations over `HttpRequest` / `HttpResponse`; only `Transport`
//!   touches the network, so tests substitute their own.
//! - Argument and configuration errors come back synchronously from
//!   `invoke`; everything discovered after the round-trip travels inside the
//!   `Completion`.
//! - The default transport is blocking `ureq`, run on Tokio's blocking pool.

pub mod auth;
pub mod config;
pub mod connector;
pub mod error;
pub mod http;
pub mod multipart;
pub mod operation;
pub mod request;
pub mod response;
pub mod service;
pub mod services;
pub mod transport;

pub use auth::{Authenticator, Credentials, IamTokenManager};
pub use config::ServiceConfig;
pub use connector::{Completion, Connector, Dispatch, Pending};
pub use error::{WatsonError, WatsonResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::{Form, FormPart};
pub use operation::{ArgValue, Arguments, Operation, Param, ParamLocation};
pub use request::{Request, RequestBody};
pub use response::{CustomData, DetailedResponse, ResponseKind, ResultBody};
pub use service::{RequestContext, Service, ServiceInfo};
pub use transport::{Transport, UreqTransport};
