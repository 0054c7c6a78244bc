//! Natural Language Understanding v1.

use serde::Deserialize;
use serde_json::Value;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "natural-language-understanding",
    api_version: "v1",
    default_url: "https://api.us-south.natural-language-understanding.watson.cloud.ibm.com",
    versioned: true,
};

/// Analyze text, HTML or a public URL. `features` is a JSON object naming the
/// analyses to run, e.g. `{"keywords": {}, "entities": {"limit": 5}}`.
pub const ANALYZE: Operation = Operation {
    name: "analyze",
    method: HttpMethod::Post,
    path: "/v1/analyze",
    params: &[
        Param::required("features", BodyField),
        Param::optional("text", BodyField),
        Param::optional("html", BodyField),
        Param::optional("url", BodyField),
        Param::optional("clean", BodyField),
        Param::optional("xpath", BodyField),
        Param::optional("fallback_to_raw", BodyField),
        Param::optional("return_analyzed_text", BodyField),
        Param::optional("language", BodyField),
        Param::optional("limit_text_characters", BodyField),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_MODELS: Operation = Operation {
    name: "list_models",
    method: HttpMethod::Get,
    path: "/v1/models",
    params: &[],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const DELETE_MODEL: Operation = Operation {
    name: "delete_model",
    method: HttpMethod::Delete,
    path: "/v1/models/{model_id}",
    params: &[Param::required("model_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[ANALYZE, LIST_MODELS, DELETE_MODEL];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisResults {
    pub language: Option<String>,
    pub analyzed_text: Option<String>,
    pub retrieved_url: Option<String>,
    pub usage: Option<AnalysisUsage>,
    #[serde(default)]
    pub keywords: Vec<KeywordsResult>,
    #[serde(default)]
    pub entities: Vec<EntitiesResult>,
    #[serde(default)]
    pub categories: Vec<CategoriesResult>,
    pub sentiment: Option<Value>,
    pub emotion: Option<Value>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct AnalysisUsage {
    pub features: u32,
    pub text_characters: u64,
    pub text_units: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KeywordsResult {
    pub text: String,
    pub relevance: f64,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EntitiesResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub relevance: f64,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoriesResult {
    pub label: String,
    pub score: f64,
}
