//! Logical request assembled by an operation descriptor.
//!
//! # Design
//! `Request` is the unresolved form of a call: path segments relative to the
//! service URL, query pairs, per-call headers and an optional body. It knows
//! nothing about credentials or the base URL; `Request::resolve` turns it into
//! an `HttpRequest` once the connector supplies both. A request is built
//! fresh for every call and consumed by dispatch.

use serde_json::Value;
use url::Url;

use crate::error::{WatsonError, WatsonResult};
use crate::http::{find_header, set_header, HttpMethod, HttpRequest};
use crate::multipart::{Form, FormPart};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Form),
    Raw {
        content: Vec<u8>,
        content_type: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: HttpMethod,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl Request {
    /// `path` is split on `/`; each piece becomes one path segment and is
    /// percent-encoded on resolution.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            segments: split_path(path),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn from_segments(method: HttpMethod, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Path as it will appear before percent-encoding, with a leading `/`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// The multipart form, if this request carries one.
    pub fn form(&self) -> Option<&Form> {
        match &self.body {
            Some(RequestBody::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn add_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.push((name.into(), value.into()));
    }

    /// Insert `version` ahead of every other query parameter.
    pub(crate) fn prepend_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.insert(0, (name.into(), value.into()));
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        set_header(&mut self.headers, name, value);
    }

    pub fn set_json_body(&mut self, value: Value) {
        self.body = Some(RequestBody::Json(value));
    }

    pub fn set_raw_body(&mut self, content: Vec<u8>, content_type: impl Into<String>) {
        self.body = Some(RequestBody::Raw {
            content,
            content_type: content_type.into(),
        });
    }

    /// Append a part, starting a form body if there is none yet.
    pub fn push_form_part(&mut self, part: FormPart) {
        match &mut self.body {
            Some(RequestBody::Form(form)) => form.push(part),
            _ => {
                let mut form = Form::new();
                form.push(part);
                self.body = Some(RequestBody::Form(form));
            }
        }
    }

    /// Insert the object field into the JSON body, starting one if needed.
    pub fn set_json_field(&mut self, name: &str, value: Value) {
        match &mut self.body {
            Some(RequestBody::Json(Value::Object(map))) => {
                map.insert(name.to_string(), value);
            }
            _ => {
                let mut map = serde_json::Map::new();
                map.insert(name.to_string(), value);
                self.body = Some(RequestBody::Json(Value::Object(map)));
            }
        }
    }

    /// Resolve against `base`, merging headers in precedence order: `defaults`,
    /// then `authorization`, then this request's own headers.
    pub fn resolve(
        self,
        base: &Url,
        defaults: &[(String, String)],
        authorization: Option<&str>,
    ) -> WatsonResult<HttpRequest> {
        let mut url = base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                WatsonError::Configuration(format!("service URL `{base}` cannot be a base"))
            })?;
            path.pop_if_empty();
            path.extend(self.segments.iter().filter(|segment| !segment.is_empty()));
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        let mut headers = Vec::new();
        for (name, value) in defaults {
            set_header(&mut headers, name, value);
        }
        if let Some(authorization) = authorization {
            set_header(&mut headers, "Authorization", authorization);
        }

        let body = match self.body {
            None => None,
            Some(RequestBody::Json(value)) => {
                set_header(&mut headers, "Content-Type", "application/json");
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| WatsonError::Serialization(e.to_string()))?;
                Some(bytes)
            }
            Some(RequestBody::Form(form)) => {
                set_header(&mut headers, "Content-Type", &form.content_type());
                Some(form.encode())
            }
            Some(RequestBody::Raw {
                content,
                content_type,
            }) => {
                set_header(&mut headers, "Content-Type", &content_type);
                Some(content)
            }
        };

        for (name, value) in &self.headers {
            set_header(&mut headers, name, value);
        }

        Ok(HttpRequest {
            method: self.method,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
