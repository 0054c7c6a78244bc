//! Text to Speech v1.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "text_to_speech",
    api_version: "v1",
    default_url: "https://api.us-south.text-to-speech.watson.cloud.ibm.com",
    versioned: false,
};

pub const LIST_VOICES: Operation = Operation {
    name: "list_voices",
    method: HttpMethod::Get,
    path: "/v1/voices",
    params: &[],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const GET_VOICE: Operation = Operation {
    name: "get_voice",
    method: HttpMethod::Get,
    path: "/v1/voices/{voice}",
    params: &[
        Param::required("voice", Path),
        Param::optional("customization_id", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// Synthesize audio. Pass an `Accept` argument such as `audio/wav` or
/// `audio/ogg;codecs=opus` to choose the format; the answer is raw audio.
pub const SYNTHESIZE: Operation = Operation {
    name: "synthesize",
    method: HttpMethod::Post,
    path: "/v1/synthesize",
    params: &[
        Param::required("text", BodyField),
        Param::optional("Accept", Header),
        Param::optional("voice", Query),
        Param::optional("customization_id", Query),
    ],
    accept: Some("audio/ogg;codecs=opus"),
    response: ResponseKind::Bytes,
};

pub const GET_PRONUNCIATION: Operation = Operation {
    name: "get_pronunciation",
    method: HttpMethod::Get,
    path: "/v1/pronunciation",
    params: &[
        Param::required("text", Query),
        Param::optional("voice", Query),
        Param::optional("format", Query),
        Param::optional("customization_id", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DELETE_VOICE_MODEL: Operation = Operation {
    name: "delete_voice_model",
    method: HttpMethod::Delete,
    path: "/v1/customizations/{customization_id}",
    params: &[Param::required("customization_id", Path)],
    accept: None,
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[
    LIST_VOICES,
    GET_VOICE,
    SYNTHESIZE,
    GET_PRONUNCIATION,
    DELETE_VOICE_MODEL,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Voices {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Voice {
    pub name: String,
    pub language: String,
    pub gender: String,
    pub url: String,
    pub description: String,
    #[serde(default)]
    pub customizable: bool,
    pub supported_features: Option<SupportedFeatures>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SupportedFeatures {
    pub custom_pronunciation: bool,
    pub voice_transformation: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Pronunciation {
    pub pronunciation: String,
}
