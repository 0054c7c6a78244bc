//! Speech to Text v1.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "speech_to_text",
    api_version: "v1",
    default_url: "https://api.us-south.speech-to-text.watson.cloud.ibm.com",
    versioned: false,
};

pub const LIST_MODELS: Operation = Operation {
    name: "list_models",
    method: HttpMethod::Get,
    path: "/v1/models",
    params: &[],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const GET_MODEL: Operation = Operation {
    name: "get_model",
    method: HttpMethod::Get,
    path: "/v1/models/{model_id}",
    params: &[Param::required("model_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// Sessionless recognition. The `audio` argument is the raw audio body; use
/// `Arguments::bytes("audio", data, "audio/flac")` or a `FormPart` with a
/// content type.
pub const RECOGNIZE: Operation = Operation {
    name: "recognize",
    method: HttpMethod::Post,
    path: "/v1/recognize",
    params: &[
        Param::required("audio", Body),
        Param::optional("model", Query),
        Param::optional("language_customization_id", Query),
        Param::optional("acoustic_customization_id", Query),
        Param::optional("keywords", Query),
        Param::optional("keywords_threshold", Query),
        Param::optional("max_alternatives", Query),
        Param::optional("word_confidence", Query),
        Param::optional("timestamps", Query),
        Param::optional("profanity_filter", Query),
        Param::optional("smart_formatting", Query),
        Param::optional("speaker_labels", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_LANGUAGE_MODELS: Operation = Operation {
    name: "list_language_models",
    method: HttpMethod::Get,
    path: "/v1/customizations",
    params: &[Param::optional("language", Query)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const DELETE_LANGUAGE_MODEL: Operation = Operation {
    name: "delete_language_model",
    method: HttpMethod::Delete,
    path: "/v1/customizations/{customization_id}",
    params: &[Param::required("customization_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[
    LIST_MODELS,
    GET_MODEL,
    RECOGNIZE,
    LIST_LANGUAGE_MODELS,
    DELETE_LANGUAGE_MODEL,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechModels {
    #[serde(default)]
    pub models: Vec<SpeechModel>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechModel {
    pub name: String,
    pub language: String,
    pub rate: u32,
    pub url: String,
    pub description: String,
    pub sessions: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechRecognitionResults {
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResult>,
    #[serde(default)]
    pub result_index: u32,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechRecognitionResult {
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechRecognitionAlternative {
    pub transcript: String,
    pub confidence: Option<f64>,
}
