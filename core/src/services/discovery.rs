//! Discovery v1.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "discovery",
    api_version: "v1",
    default_url: "https://api.us-south.discovery.watson.cloud.ibm.com",
    versioned: true,
};

pub const LIST_ENVIRONMENTS: Operation = Operation {
    name: "list_environments",
    method: HttpMethod::Get,
    path: "/v1/environments",
    params: &[Param::optional("name", Query)],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_COLLECTIONS: Operation = Operation {
    name: "list_collections",
    method: HttpMethod::Get,
    path: "/v1/environments/{environment_id}/collections",
    params: &[
        Param::required("environment_id", Path),
        Param::optional("name", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const QUERY: Operation = Operation {
    name: "query",
    method: HttpMethod::Post,
    path: "/v1/environments/{environment_id}/collections/{collection_id}/query",
    params: &[
        Param::required("environment_id", Path),
        Param::required("collection_id", Path),
        Param::optional("filter", BodyField),
        Param::optional("query", BodyField),
        Param::optional("natural_language_query", BodyField),
        Param::optional("aggregation", BodyField),
        Param::optional("count", BodyField),
        Param::optional("return", BodyField),
        Param::optional("offset", BodyField),
        Param::optional("sort", BodyField),
        Param::optional("highlight", BodyField),
        Param::optional("X-Watson-Logging-Opt-Out", Header),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

/// Upload a document. `file` is the document itself; `metadata` is a JSON
/// object stored alongside it.
pub const ADD_DOCUMENT: Operation = Operation {
    name: "add_document",
    method: HttpMethod::Post,
    path: "/v1/environments/{environment_id}/collections/{collection_id}/documents",
    params: &[
        Param::required("environment_id", Path),
        Param::required("collection_id", Path),
        Param::optional("file", Form),
        Param::optional("metadata", Form),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DELETE_DOCUMENT: Operation = Operation {
    name: "delete_document",
    method: HttpMethod::Delete,
    path: "/v1/environments/{environment_id}/collections/{collection_id}/documents/{document_id}",
    params: &[
        Param::required("environment_id", Path),
        Param::required("collection_id", Path),
        Param::required("document_id", Path),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const OPERATIONS: &[Operation] = &[
    LIST_ENVIRONMENTS,
    LIST_COLLECTIONS,
    QUERY,
    ADD_DOCUMENT,
    DELETE_DOCUMENT,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ListEnvironmentsResponse {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Environment {
    pub environment_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryResponse {
    #[serde(default)]
    pub matching_results: u64,
    #[serde(default)]
    pub results: Vec<QueryResult>,
    #[serde(default)]
    pub aggregations: Vec<Value>,
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryResult {
    pub id: String,
    pub result_metadata: Option<QueryResultMetadata>,
    /// Document fields vary per collection.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct QueryResultMetadata {
    pub score: f64,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DocumentAccepted {
    pub document_id: String,
    pub status: String,
    #[serde(default)]
    pub notices: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeleteDocumentResponse {
    pub document_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::multipart::FormPart;
    use crate::operation::Arguments;

    #[test]
    fn add_document_sends_file_and_metadata_parts() {
        let args = Arguments::new()
            .text("environment_id", "env")
            .text("collection_id", "col")
            .file(
                "file",
                FormPart::file("file", "faq.html", b"<html/>".to_vec()).with_content_type("text/html"),
            )
            .json("metadata", json!({"Creator": "me"}));
        let request = ADD_DOCUMENT.build_request(&args).unwrap();
        assert_eq!(request.path(), "/v1/environments/env/collections/col/documents");
        let form = request.form().unwrap();
        assert_eq!(form.names().collect::<Vec<_>>(), vec!["file", "metadata"]);
        assert_eq!(
            form.get("metadata").unwrap().content_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn query_results_keep_document_fields() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"matching_results":1,"results":[{"id":"d1","result_metadata":{"score":1.2},"title":"FAQ"}]}"#,
        )
        .unwrap();
        let result = &response.results[0];
        assert_eq!(result.id, "d1");
        assert_eq!(result.fields.get("title"), Some(&json!("FAQ")));
    }
}
