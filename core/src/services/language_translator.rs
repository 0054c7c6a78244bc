//! Language Translator v3.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "language_translator",
    api_version: "v3",
    default_url: "https://api.us-south.language-translator.watson.cloud.ibm.com",
    versioned: true,
};

/// `text` is a JSON array of strings; name a model or a source/target pair.
pub const TRANSLATE: Operation = Operation {
    name: "translate",
    method: HttpMethod::Post,
    path: "/v3/translate",
    params: &[
        Param::required("text", BodyField),
        Param::optional("model_id", BodyField),
        Param::optional("source", BodyField),
        Param::optional("target", BodyField),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const IDENTIFY: Operation = Operation {
    name: "identify",
    method: HttpMethod::Post,
    path: "/v3/identify",
    params: &[Param::required("text", Body)],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_IDENTIFIABLE_LANGUAGES: Operation = Operation {
    name: "list_identifiable_languages",
    method: HttpMethod::Get,
    path: "/v3/identifiable_languages",
    params: &[],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const LIST_MODELS: Operation = Operation {
    name: "list_models",
    method: HttpMethod::Get,
    path: "/v3/models",
    params: &[
        Param::optional("source", Query),
        Param::optional("target", Query),
        Param::optional("default", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// Customize a base model with a glossary and/or parallel corpus (TMX files).
pub const CREATE_MODEL: Operation = Operation {
    name: "create_model",
    method: HttpMethod::Post,
    path: "/v3/models",
    params: &[
        Param::required("base_model_id", Query),
        Param::optional("name", Query),
        Param::optional("forced_glossary", Form),
        Param::optional("parallel_corpus", Form),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DELETE_MODEL: Operation = Operation {
    name: "delete_model",
    method: HttpMethod::Delete,
    path: "/v3/models/{model_id}",
    params: &[Param::required("model_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[
    TRANSLATE,
    IDENTIFY,
    LIST_IDENTIFIABLE_LANGUAGES,
    LIST_MODELS,
    CREATE_MODEL,
    DELETE_MODEL,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TranslationResult {
    pub word_count: u64,
    pub character_count: u64,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Translation {
    pub translation: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IdentifiedLanguages {
    #[serde(default)]
    pub languages: Vec<IdentifiedLanguage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IdentifiedLanguage {
    pub language: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TranslationModels {
    #[serde(default)]
    pub models: Vec<TranslationModel>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TranslationModel {
    pub model_id: String,
    pub name: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub base_model_id: Option<String>,
    pub domain: Option<String>,
    pub customizable: Option<bool>,
    #[serde(rename = "default_model")]
    pub is_default: Option<bool>,
    pub owner: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::operation::Arguments;
    use crate::request::RequestBody;

    #[test]
    fn identify_sends_plain_text() {
        let request = IDENTIFY
            .build_request(&Arguments::new().text("text", "Language Translator translates text"))
            .unwrap();
        match request.body() {
            Some(RequestBody::Raw { content_type, .. }) => assert_eq!(content_type, "text/plain"),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn translate_omits_absent_fields() {
        let request = TRANSLATE
            .build_request(&Arguments::new().json("text", json!(["Hello"])).text("model_id", "en-es"))
            .unwrap();
        assert_eq!(
            request.body(),
            Some(&RequestBody::Json(json!({"text": ["Hello"], "model_id": "en-es"})))
        );
    }
}
