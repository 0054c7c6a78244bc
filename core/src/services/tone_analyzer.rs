//! Tone Analyzer v3.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "tone_analyzer",
    api_version: "v3",
    default_url: "https://api.us-south.tone-analyzer.watson.cloud.ibm.com",
    versioned: true,
};

/// General-purpose tone analysis. `tone_input` is either a JSON
/// `{"text": ...}` object or raw text/HTML with its content type.
pub const TONE: Operation = Operation {
    name: "tone",
    method: HttpMethod::Post,
    path: "/v3/tone",
    params: &[
        Param::required("tone_input", Body),
        Param::optional("sentences", Query),
        Param::optional("tones", Query),
        Param::optional("Content-Language", Header),
        Param::optional("Accept-Language", Header),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const TONE_CHAT: Operation = Operation {
    name: "tone_chat",
    method: HttpMethod::Post,
    path: "/v3/tone_chat",
    params: &[
        Param::required("utterances", BodyField),
        Param::optional("Content-Language", Header),
        Param::optional("Accept-Language", Header),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const OPERATIONS: &[Operation] = &[TONE, TONE_CHAT];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToneAnalysis {
    pub document_tone: DocumentAnalysis,
    #[serde(default)]
    pub sentences_tone: Vec<SentenceAnalysis>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DocumentAnalysis {
    #[serde(default)]
    pub tones: Vec<ToneScore>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SentenceAnalysis {
    pub sentence_id: u32,
    pub text: String,
    #[serde(default)]
    pub tones: Vec<ToneScore>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToneScore {
    pub score: f64,
    pub tone_id: String,
    pub tone_name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UtteranceAnalyses {
    #[serde(default)]
    pub utterances_tone: Vec<UtteranceAnalysis>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UtteranceAnalysis {
    pub utterance_id: u32,
    pub utterance_text: String,
    #[serde(default)]
    pub tones: Vec<ToneScore>,
}
