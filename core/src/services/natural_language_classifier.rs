//! Natural Language Classifier v1.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "natural_language_classifier",
    api_version: "v1",
    default_url: "https://api.us-south.natural-language-classifier.watson.cloud.ibm.com",
    versioned: false,
};

pub const CLASSIFY: Operation = Operation {
    name: "classify",
    method: HttpMethod::Post,
    path: "/v1/classifiers/{classifier_id}/classify",
    params: &[
        Param::required("classifier_id", Path),
        Param::required("text", BodyField),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// Train a classifier from CSV training data and a JSON metadata document
/// (`{"language": "en", "name": ...}`).
pub const CREATE_CLASSIFIER: Operation = Operation {
    name: "create_classifier",
    method: HttpMethod::Post,
    path: "/v1/classifiers",
    params: &[
        Param::required("training_metadata", Form),
        Param::required("training_data", Form),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_CLASSIFIERS: Operation = Operation {
    name: "list_classifiers",
    method: HttpMethod::Get,
    path: "/v1/classifiers",
    params: &[],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const GET_CLASSIFIER: Operation = Operation {
    name: "get_classifier",
    method: HttpMethod::Get,
    path: "/v1/classifiers/{classifier_id}",
    params: &[Param::required("classifier_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DELETE_CLASSIFIER: Operation = Operation {
    name: "delete_classifier",
    method: HttpMethod::Delete,
    path: "/v1/classifiers/{classifier_id}",
    params: &[Param::required("classifier_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[
    CLASSIFY,
    CREATE_CLASSIFIER,
    LIST_CLASSIFIERS,
    GET_CLASSIFIER,
    DELETE_CLASSIFIER,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Classification {
    pub classifier_id: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub top_class: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassifiedClass>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassifiedClass {
    pub confidence: f64,
    pub class_name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassifierList {
    #[serde(default)]
    pub classifiers: Vec<Classifier>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Classifier {
    pub classifier_id: String,
    pub url: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub created: Option<String>,
    pub status_description: Option<String>,
    pub language: Option<String>,
}
