//! Visual Recognition v3.

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "visual_recognition",
    api_version: "v3",
    default_url: "https://api.us-south.visual-recognition.watson.cloud.ibm.com",
    versioned: true,
};

/// Classify images from an uploaded file (image or zip) or a URL.
pub const CLASSIFY: Operation = Operation {
    name: "classify",
    method: HttpMethod::Post,
    path: "/v3/classify",
    params: &[
        Param::optional("images_file", Form),
        Param::optional("url", Form),
        Param::optional("threshold", Form),
        Param::optional("owners", Form),
        Param::optional("classifier_ids", Form),
        Param::optional("Accept-Language", Header),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DETECT_FACES: Operation = Operation {
    name: "detect_faces",
    method: HttpMethod::Post,
    path: "/v3/detect_faces",
    params: &[
        Param::optional("images_file", Form),
        Param::optional("url", Form),
        Param::optional("Accept-Language", Header),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_CLASSIFIERS: Operation = Operation {
    name: "list_classifiers",
    method: HttpMethod::Get,
    path: "/v3/classifiers",
    params: &[Param::optional("verbose", Query)],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const GET_CLASSIFIER: Operation = Operation {
    name: "get_classifier",
    method: HttpMethod::Get,
    path: "/v3/classifiers/{classifier_id}",
    params: &[Param::required("classifier_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// Train a custom classifier. Supply one zip per class with
/// `Arguments::keyed_file("positive_examples", class, zip)`; each becomes a
/// `{class}_positive_examples` part.
pub const CREATE_CLASSIFIER: Operation = Operation {
    name: "create_classifier",
    method: HttpMethod::Post,
    path: "/v3/classifiers",
    params: &[
        Param::required("name", Form),
        Param::required("positive_examples", ClassKeyedForm),
        Param::optional("negative_examples", Form),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const UPDATE_CLASSIFIER: Operation = Operation {
    name: "update_classifier",
    method: HttpMethod::Post,
    path: "/v3/classifiers/{classifier_id}",
    params: &[
        Param::required("classifier_id", Path),
        Param::optional("positive_examples", ClassKeyedForm),
        Param::optional("negative_examples", Form),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DELETE_CLASSIFIER: Operation = Operation {
    name: "delete_classifier",
    method: HttpMethod::Delete,
    path: "/v3/classifiers/{classifier_id}",
    params: &[Param::required("classifier_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

/// Download a classifier's Core ML model file.
pub const GET_CORE_ML_MODEL: Operation = Operation {
    name: "get_core_ml_model",
    method: HttpMethod::Get,
    path: "/v3/classifiers/{classifier_id}/core_ml_model",
    params: &[Param::required("classifier_id", Path)],
    accept: Some("application/octet-stream"),
    response: ResponseKind::Bytes,
};

pub const DELETE_USER_DATA: Operation = Operation {
    name: "delete_user_data",
    method: HttpMethod::Delete,
    path: "/v3/user_data",
    params: &[Param::required("customer_id", Query)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[
    CLASSIFY,
    DETECT_FACES,
    LIST_CLASSIFIERS,
    GET_CLASSIFIER,
    CREATE_CLASSIFIER,
    UPDATE_CLASSIFIER,
    DELETE_CLASSIFIER,
    GET_CORE_ML_MODEL,
    DELETE_USER_DATA,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassifiedImages {
    #[serde(default)]
    pub custom_classes: Option<u32>,
    #[serde(default)]
    pub images_processed: Option<u32>,
    #[serde(default)]
    pub images: Vec<ClassifiedImage>,
    #[serde(default)]
    pub warnings: Vec<WarningInfo>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassifiedImage {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub resolved_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<ClassifierResult>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassifierResult {
    pub name: String,
    pub classifier_id: String,
    #[serde(default)]
    pub classes: Vec<ClassResult>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClassResult {
    pub class: String,
    pub score: f64,
    #[serde(default)]
    pub type_hierarchy: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WarningInfo {
    pub warning_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Classifiers {
    #[serde(default)]
    pub classifiers: Vec<Classifier>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Classifier {
    pub classifier_id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub core_ml_enabled: Option<bool>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Class {
    pub class: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DetectedFaces {
    #[serde(default)]
    pub images_processed: Option<u32>,
    #[serde(default)]
    pub images: Vec<ImageWithFaces>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImageWithFaces {
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub faces: Vec<Face>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Face {
    #[serde(default)]
    pub age: Option<FaceAge>,
    #[serde(default)]
    pub gender: Option<FaceGender>,
    #[serde(default)]
    pub face_location: Option<FaceLocation>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FaceAge {
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FaceGender {
    pub gender: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct FaceLocation {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::FormPart;
    use crate::operation::Arguments;

    #[test]
    fn classified_images_decode() {
        let body = r#"{
            "custom_classes": 0,
            "images_processed": 1,
            "images": [{
                "image": "turtle.jpg",
                "classifiers": [{
                    "name": "default",
                    "classifier_id": "default",
                    "classes": [{"class": "turtle", "score": 0.93, "type_hierarchy": "/reptile/turtle"}]
                }]
            }]
        }"#;
        let parsed: ClassifiedImages = serde_json::from_str(body).unwrap();
        let class = &parsed.images[0].classifiers[0].classes[0];
        assert_eq!(class.class, "turtle");
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn create_classifier_requires_examples() {
        let args = Arguments::new().text("name", "dogs");
        assert!(CREATE_CLASSIFIER.build_request(&args).is_err());

        let args = args.keyed_file(
            "positive_examples",
            "beagle",
            FormPart::file("", "beagle.zip", b"PK".to_vec()),
        );
        let request = CREATE_CLASSIFIER.build_request(&args).unwrap();
        assert!(request.form().unwrap().contains("beagle_positive_examples"));
    }
}
