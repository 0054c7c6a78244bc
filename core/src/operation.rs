//! Table-driven operation descriptors.
//!
//! # Design
//! Every Watson endpoint is described by a `const Operation`: verb, path
//! template, the parameters it accepts and where each one goes, and the shape
//! of its result. One generic `Operation::build_request` interprets the
//! descriptor against caller-supplied `Arguments`, so there is a single place
//! that validates required parameters, omits absent optionals and lays out
//! query strings, headers, multipart forms and bodies.

use serde_json::Value;

use crate::error::{WatsonError, WatsonResult};
use crate::http::HttpMethod;
use crate::multipart::FormPart;
use crate::request::Request;
use crate::response::ResponseKind;

/// Where a parameter's value is placed in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into the `{name}` segment of the path template.
    Path,
    Query,
    Header,
    /// One multipart part named after the parameter.
    Form,
    /// One multipart part per caller key, named `{key}_{param}`.
    ClassKeyedForm,
    /// A field of a JSON object body.
    BodyField,
    /// The entire request body.
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str, location: ParamLocation) -> Self {
        Self {
            name,
            location,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, location: ParamLocation) -> Self {
        Self {
            name,
            location,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path relative to the service URL, e.g. `/v3/classifiers/{classifier_id}`.
    pub path: &'static str,
    pub params: &'static [Param],
    /// Default `Accept` header. A `Header` parameter named `Accept` overrides it.
    pub accept: Option<&'static str>,
    pub response: ResponseKind,
}

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Json(Value),
    File(FormPart),
    Bytes {
        content: Vec<u8>,
        content_type: String,
    },
    /// Files keyed by a caller-chosen name, e.g. one zip per class.
    Keyed(Vec<(String, FormPart)>),
}

impl ArgValue {
    fn is_empty(&self) -> bool {
        match self {
            ArgValue::Text(text) => text.is_empty(),
            ArgValue::Json(value) => value.is_null(),
            ArgValue::File(part) => part.content.is_empty(),
            ArgValue::Bytes { content, .. } => content.is_empty(),
            ArgValue::Keyed(files) => files.is_empty(),
        }
    }
}

/// Named arguments for one call. Absent names are simply never set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, ArgValue)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        let name = name.into();
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, ArgValue::Text(value.into()))
    }

    /// A list parameter, sent comma-separated.
    pub fn list<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.text(name, joined)
    }

    pub fn json(self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, ArgValue::Json(value))
    }

    pub fn file(self, name: impl Into<String>, part: FormPart) -> Self {
        self.set(name, ArgValue::File(part))
    }

    pub fn bytes(
        self,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
    ) -> Self {
        self.set(
            name,
            ArgValue::Bytes {
                content: content.into(),
                content_type: content_type.into(),
            },
        )
    }

    /// Add one keyed file under `name`; repeated calls accumulate.
    pub fn keyed_file(mut self, name: impl Into<String>, key: impl Into<String>, part: FormPart) -> Self {
        let name = name.into();
        let key = key.into();
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, ArgValue::Keyed(files))) => files.push((key, part)),
            Some(entry) => entry.1 = ArgValue::Keyed(vec![(key, part)]),
            None => self.values.push((name, ArgValue::Keyed(vec![(key, part)]))),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }
}

impl Operation {
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Validate `args` and lay them out into a `Request`.
    ///
    /// Fails with `InvalidArgument` when a required parameter is absent or
    /// empty, when an argument is not declared by this operation, or when a
    /// value kind does not fit its location.
    pub fn build_request(&self, args: &Arguments) -> WatsonResult<Request> {
        for name in args.names() {
            if self.param(name).is_none() {
                return Err(self.invalid(name, "parameter is not accepted by this operation"));
            }
        }
        for param in self.params.iter().filter(|param| param.required) {
            match args.get(param.name) {
                Some(value) if !value.is_empty() => {}
                _ => return Err(WatsonError::missing(self.name, param.name)),
            }
        }

        let mut segments = Vec::new();
        for segment in self.path.split('/').filter(|segment| !segment.is_empty()) {
            match segment.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
                Some(name) => match args.get(name) {
                    Some(ArgValue::Text(value)) if value == "." || value == ".." => {
                        return Err(self.invalid(name, "path parameters cannot be `.` or `..`"))
                    }
                    Some(ArgValue::Text(value)) => segments.push(value.clone()),
                    Some(_) => return Err(self.invalid(name, "path parameters must be text")),
                    None => return Err(WatsonError::missing(self.name, name)),
                },
                None => segments.push(segment.to_string()),
            }
        }

        let mut request = Request::from_segments(self.method, segments);
        if let Some(accept) = self.accept {
            request.set_header("Accept", accept);
        }

        for param in self.params {
            let Some(value) = args.get(param.name) else {
                continue;
            };
            match param.location {
                ParamLocation::Path => {}
                ParamLocation::Query => request.add_query(param.name, self.scalar(param, value)?),
                ParamLocation::Header => {
                    let value = self.scalar(param, value)?;
                    request.set_header(param.name, &value);
                }
                ParamLocation::Form => request.push_form_part(self.form_part(param, value)?),
                ParamLocation::ClassKeyedForm => match value {
                    ArgValue::Keyed(files) => {
                        for (key, part) in files {
                            let name = format!("{key}_{}", param.name);
                            request.push_form_part(part.clone().with_name(name));
                        }
                    }
                    _ => return Err(self.invalid(param.name, "expected keyed files")),
                },
                ParamLocation::BodyField => {
                    let field = match value {
                        ArgValue::Text(text) => Value::String(text.clone()),
                        ArgValue::Json(json) => json.clone(),
                        _ => return Err(self.invalid(param.name, "expected text or JSON")),
                    };
                    request.set_json_field(param.name, field);
                }
                ParamLocation::Body => match value {
                    ArgValue::Json(json) => request.set_json_body(json.clone()),
                    ArgValue::Text(text) => {
                        request.set_raw_body(text.clone().into_bytes(), "text/plain")
                    }
                    ArgValue::Bytes {
                        content,
                        content_type,
                    } => request.set_raw_body(content.clone(), content_type.clone()),
                    ArgValue::File(part) => request.set_raw_body(
                        part.content.clone(),
                        part.content_type
                            .clone()
                            .unwrap_or_else(|| "application/octet-stream".to_string()),
                    ),
                    ArgValue::Keyed(_) => {
                        return Err(self.invalid(param.name, "keyed files cannot be a body"))
                    }
                },
            }
        }

        Ok(request)
    }

    fn scalar(&self, param: &Param, value: &ArgValue) -> WatsonResult<String> {
        match value {
            ArgValue::Text(text) => Ok(text.clone()),
            ArgValue::Json(Value::String(text)) => Ok(text.clone()),
            ArgValue::Json(Value::Array(items)) => Ok(items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",")),
            ArgValue::Json(json) => Ok(json.to_string()),
            _ => Err(self.invalid(param.name, "expected a text value")),
        }
    }

    fn form_part(&self, param: &Param, value: &ArgValue) -> WatsonResult<FormPart> {
        match value {
            ArgValue::Text(text) => Ok(FormPart::text(param.name, text.clone())),
            ArgValue::Json(json) => Ok(FormPart::text(param.name, json.to_string())
                .with_content_type("application/json")),
            ArgValue::File(part) => Ok(part.clone().with_name(param.name)),
            ArgValue::Bytes {
                content,
                content_type,
            } => Ok(FormPart {
                name: param.name.to_string(),
                content: content.clone(),
                filename: None,
                content_type: Some(content_type.clone()),
            }),
            ArgValue::Keyed(_) => Err(self.invalid(param.name, "expected a single part")),
        }
    }

    fn invalid(&self, parameter: &str, reason: &str) -> WatsonError {
        WatsonError::InvalidArgument {
            operation: self.name.to_string(),
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }
}
