//! Assistant v1 (workspaces and stateless message).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::http::HttpMethod;
use crate::operation::{Operation, Param, ParamLocation::*};
use crate::response::ResponseKind;
use crate::service::ServiceInfo;

pub const INFO: ServiceInfo = ServiceInfo {
    name: "conversation",
    api_version: "v1",
    default_url: "https://api.us-south.assistant.watson.cloud.ibm.com",
    versioned: true,
};

/// Send user input to a workspace. Pass the previous response's `context`
/// back to continue a conversation.
pub const MESSAGE: Operation = Operation {
    name: "message",
    method: HttpMethod::Post,
    path: "/v1/workspaces/{workspace_id}/message",
    params: &[
        Param::required("workspace_id", Path),
        Param::optional("input", BodyField),
        Param::optional("context", BodyField),
        Param::optional("intents", BodyField),
        Param::optional("entities", BodyField),
        Param::optional("alternate_intents", BodyField),
        Param::optional("nodes_visited_details", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const LIST_WORKSPACES: Operation = Operation {
    name: "list_workspaces",
    method: HttpMethod::Get,
    path: "/v1/workspaces",
    params: &[
        Param::optional("page_limit", Query),
        Param::optional("sort", Query),
        Param::optional("cursor", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const GET_WORKSPACE: Operation = Operation {
    name: "get_workspace",
    method: HttpMethod::Get,
    path: "/v1/workspaces/{workspace_id}",
    params: &[
        Param::required("workspace_id", Path),
        Param::optional("export", Query),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const CREATE_WORKSPACE: Operation = Operation {
    name: "create_workspace",
    method: HttpMethod::Post,
    path: "/v1/workspaces",
    params: &[
        Param::optional("name", BodyField),
        Param::optional("description", BodyField),
        Param::optional("language", BodyField),
        Param::optional("intents", BodyField),
        Param::optional("entities", BodyField),
        Param::optional("dialog_nodes", BodyField),
        Param::optional("metadata", BodyField),
    ],
    accept: Some("application/json"),
    response: ResponseKind::Model,
};

pub const DELETE_WORKSPACE: Operation = Operation {
    name: "delete_workspace",
    method: HttpMethod::Delete,
    path: "/v1/workspaces/{workspace_id}",
    params: &[Param::required("workspace_id", Path)],
    accept: Some("application/json"),
    response: ResponseKind::Object,
};

pub const OPERATIONS: &[Operation] = &[
    MESSAGE,
    LIST_WORKSPACES,
    GET_WORKSPACE,
    CREATE_WORKSPACE,
    DELETE_WORKSPACE,
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(default)]
    pub intents: Vec<RuntimeIntent>,
    #[serde(default)]
    pub entities: Vec<RuntimeEntity>,
    /// Conversation state to echo back on the next turn.
    #[serde(default)]
    pub context: Map<String, Value>,
    #[serde(default)]
    pub output: Map<String, Value>,
}

impl MessageResponse {
    /// Text lines produced by the dialog, if any.
    pub fn output_text(&self) -> Vec<&str> {
        self.output
            .get("text")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuntimeIntent {
    pub intent: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuntimeEntity {
    pub entity: String,
    #[serde(default)]
    pub location: Vec<u32>,
    pub value: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkspaceCollection {
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Workspace {
    pub name: String,
    pub language: String,
    pub workspace_id: String,
    pub description: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub learning_opt_out: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Pagination {
    pub refresh_url: String,
    pub next_url: Option<String>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::operation::Arguments;
    use crate::request::RequestBody;

    #[test]
    fn message_carries_input_and_context() {
        let args = Arguments::new()
            .text("workspace_id", "9978a49e-ea89-4493-b33d-82298d3db20d")
            .json("input", json!({"text": "Turn on the lights"}))
            .json("context", json!({"conversation_id": "1b7b67c0"}));
        let request = MESSAGE.build_request(&args).unwrap();
        assert_eq!(
            request.path(),
            "/v1/workspaces/9978a49e-ea89-4493-b33d-82298d3db20d/message"
        );
        assert_eq!(
            request.body(),
            Some(&RequestBody::Json(json!({
                "input": {"text": "Turn on the lights"},
                "context": {"conversation_id": "1b7b67c0"}
            })))
        );
    }

    #[test]
    fn output_text_is_collected() {
        let response: MessageResponse = serde_json::from_str(
            r#"{"intents":[{"intent":"turn_on","confidence":0.97}],
                "output":{"text":["Which lights?"]},
                "context":{"conversation_id":"1b7b67c0"}}"#,
        )
        .unwrap();
        assert_eq!(response.output_text(), vec!["Which lights?"]);
        assert_eq!(response.intents[0].intent, "turn_on");
    }
}
