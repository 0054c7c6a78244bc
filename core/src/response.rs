//! Response decoding.
//!
//! # Design
//! Results come in three shapes: a typed model, an open JSON map (delete
//! confirmations and other schemaless answers) and raw bytes (audio, model
//! files, CSV). They share one decode path and one tagged `ResultBody`
//! instead of three parallel code paths. Status and headers survive every
//! failure so the caller can still inspect what the service said.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::error;

use crate::error::WatsonError;
use crate::http::{find_header, HttpResponse};

/// Key under which the decoder stores the raw JSON text in `CustomData`.
pub const JSON_KEY: &str = "json";

/// Bytes of an undecodable body included in the error log.
const LOG_BODY_LIMIT: usize = 512;

/// Declared result shape of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Model,
    Object,
    Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultBody<T> {
    Model(T),
    Object(Map<String, Value>),
    Bytes(Vec<u8>),
}

/// HTTP metadata plus the decoded result.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedResponse<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub result: Option<ResultBody<T>>,
}

impl<T> DetailedResponse<T> {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn model(&self) -> Option<&T> {
        match &self.result {
            Some(ResultBody::Model(model)) => Some(model),
            _ => None,
        }
    }

    pub fn into_model(self) -> Option<T> {
        match self.result {
            Some(ResultBody::Model(model)) => Some(model),
            _ => None,
        }
    }

    pub fn object(&self) -> Option<&Map<String, Value>> {
        match &self.result {
            Some(ResultBody::Object(map)) => Some(map),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.result {
            Some(ResultBody::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }
}

/// Caller-owned side channel that travels with a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomData(BTreeMap<String, Value>);

impl CustomData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Raw JSON text of the last decoded body, if any.
    pub fn json(&self) -> Option<&str> {
        self.0.get(JSON_KEY).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turn a transport response into a `DetailedResponse`, returning the error
/// alongside it rather than instead of it.
pub fn decode<T: DeserializeOwned>(
    kind: ResponseKind,
    response: HttpResponse,
    custom_data: &mut CustomData,
) -> (DetailedResponse<T>, Option<WatsonError>) {
    let HttpResponse {
        status,
        headers,
        body,
    } = response;
    let mut detailed = DetailedResponse {
        status,
        headers,
        result: None,
    };

    if !(200..300).contains(&status) {
        if let Ok(text) = std::str::from_utf8(&body) {
            custom_data.insert(JSON_KEY, Value::String(text.to_string()));
        }
        return (detailed, Some(status_error(status, &body)));
    }

    if kind == ResponseKind::Bytes {
        detailed.result = Some(ResultBody::Bytes(body));
        return (detailed, None);
    }

    if status == 204 || (kind == ResponseKind::Object && body.is_empty()) {
        return (detailed, None);
    }

    let text = match String::from_utf8(body) {
        Ok(text) => text,
        Err(e) => {
            error!(status, error = %e, "response body is not valid UTF-8");
            return (detailed, Some(WatsonError::Decode(e.to_string())));
        }
    };
    custom_data.insert(JSON_KEY, Value::String(text.clone()));

    let parsed = match kind {
        ResponseKind::Model => serde_json::from_str::<T>(&text).map(ResultBody::Model),
        _ => serde_json::from_str::<Map<String, Value>>(&text).map(ResultBody::Object),
    };
    match parsed {
        Ok(result) => detailed.result = Some(result),
        Err(e) => {
            error!(status, error = %e, body = %preview(&text), "failed to decode response body");
            return (detailed, Some(WatsonError::Decode(e.to_string())));
        }
    }
    (detailed, None)
}

/// At most `LOG_BODY_LIMIT` bytes of `text`, cut on a char boundary.
fn preview(text: &str) -> &str {
    if text.len() <= LOG_BODY_LIMIT {
        return text;
    }
    let mut end = LOG_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Map a non-2xx status to the appropriate `WatsonError` variant.
fn status_error(status: u16, body: &[u8]) -> WatsonError {
    let body = String::from_utf8_lossy(body).into_owned();
    if status == 404 {
        return WatsonError::NotFound { body };
    }
    let message = error_message(&body).unwrap_or_else(|| format!("service returned status {status}"));
    WatsonError::Http {
        status,
        message,
        body,
    }
}

/// Watson services report errors as `error`, `message` or `errors[0].message`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("error")
        .and_then(|error| error.as_str().or_else(|| error.get("message")?.as_str()))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .or_else(|| value.pointer("/errors/0/message").and_then(Value::as_str))?;
    Some(message.to_string())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Classifier {
        classifier_id: String,
        name: String,
    }

    fn response(status: u16, body: &[u8]) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("X-Global-Transaction-Id".to_string(), "tx-1".to_string())],
            body: body.to_vec(),
        }
    }

    #[test]
    fn model_is_deserialized() {
        let mut custom = CustomData::new();
        let body = br#"{"classifier_id":"dogs_1","name":"dogs"}"#;
        let (detailed, error) = decode::<Classifier>(ResponseKind::Model, response(200, body), &mut custom);
        assert!(error.is_none());
        assert_eq!(detailed.model().unwrap().name, "dogs");
        assert_eq!(detailed.header("x-global-transaction-id"), Some("tx-1"));
        assert_eq!(custom.json(), Some(std::str::from_utf8(body).unwrap()));
    }

    #[test]
    fn object_kind_yields_an_open_map() {
        let mut custom = CustomData::new();
        let (detailed, error) =
            decode::<Value>(ResponseKind::Object, response(200, br#"{"deleted":true,"x":1}"#), &mut custom);
        assert!(error.is_none());
        let map = detailed.object().unwrap();
        assert_eq!(map.get("deleted"), Some(&Value::Bool(true)));
    }

    #[test]
    fn bytes_skip_json_parsing() {
        let mut custom = CustomData::new();
        let audio = vec![b'R', b'I', b'F', b'F', 0, 0xff, 0xfe];
        let (detailed, error) = decode::<Value>(ResponseKind::Bytes, response(200, &audio), &mut custom);
        assert!(error.is_none());
        assert_eq!(detailed.bytes(), Some(audio.as_slice()));
        assert!(custom.json().is_none());
    }

    #[test]
    fn invalid_json_keeps_metadata_and_reports_decode_error() {
        let mut custom = CustomData::new();
        let (detailed, error) =
            decode::<Classifier>(ResponseKind::Model, response(200, b"<html>oops</html>"), &mut custom);
        assert!(matches!(error, Some(WatsonError::Decode(_))));
        assert_eq!(detailed.status, 200);
        assert!(detailed.result.is_none());
        assert_eq!(detailed.headers.len(), 1);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let mut custom = CustomData::new();
        let (_, error) = decode::<Value>(ResponseKind::Object, response(200, &[0xff, 0xfe]), &mut custom);
        assert!(matches!(error, Some(WatsonError::Decode(_))));
    }

    #[test]
    fn json_key_is_overwritten() {
        let mut custom = CustomData::new();
        custom.insert(JSON_KEY, Value::String("stale".into()));
        custom.insert("caller", Value::from(7));
        decode::<Value>(ResponseKind::Object, response(200, b"{}"), &mut custom);
        assert_eq!(custom.json(), Some("{}"));
        assert_eq!(custom.get("caller"), Some(&Value::from(7)));
    }

    #[test]
    fn not_found_maps_to_dedicated_variant() {
        let mut custom = CustomData::new();
        let (detailed, error) = decode::<Classifier>(
            ResponseKind::Model,
            response(404, br#"{"code":404,"error":"Classifier not found"}"#),
            &mut custom,
        );
        assert!(matches!(error, Some(WatsonError::NotFound { .. })));
        assert_eq!(detailed.status, 404);
    }

    #[test]
    fn http_error_message_comes_from_body() {
        let mut custom = CustomData::new();
        let (_, error) = decode::<Classifier>(
            ResponseKind::Model,
            response(400, br#"{"code":400,"error":"Invalid version"}"#),
            &mut custom,
        );
        match error {
            Some(WatsonError::Http { status, message, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid version");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn nested_error_formats_are_understood() {
        assert_eq!(
            error_message(r#"{"errors":[{"message":"bad input"}]}"#).as_deref(),
            Some("bad input")
        );
        assert_eq!(
            error_message(r#"{"error":{"message":"nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(error_message("not json"), None);
    }

    #[test]
    fn logged_body_is_truncated_on_a_char_boundary() {
        assert_eq!(preview("short"), "short");

        let long = "x".repeat(LOG_BODY_LIMIT * 4);
        assert_eq!(preview(&long).len(), LOG_BODY_LIMIT);

        let wide = format!("x{}", "é".repeat(LOG_BODY_LIMIT));
        let cut = preview(&wide);
        assert!(cut.len() <= LOG_BODY_LIMIT);
        assert!(cut.len() >= LOG_BODY_LIMIT - 1);
        assert!(wide.starts_with(cut));
    }

    #[test]
    fn no_content_has_no_result_and_no_error() {
        let mut custom = CustomData::new();
        let (detailed, error) = decode::<Classifier>(ResponseKind::Model, response(204, b""), &mut custom);
        assert!(error.is_none());
        assert!(detailed.result.is_none());
    }
}
