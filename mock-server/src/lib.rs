//! In-process imitation of a few Watson endpoints, used by the client core's
//! integration tests.
//!
//! Every `/v1` and `/v3` route requires an `Authorization` header and answers
//! 401 otherwise. `/identity/token` plays the IAM token service.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Multipart, Path, RawQuery, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, delete, get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// API key the token endpoint refuses.
pub const REJECTED_API_KEY: &str = "revoked-key";

/// One multipart part as the server received it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReceivedPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub content: String,
}

#[derive(Default)]
pub struct MockState {
    api_requests: AtomicUsize,
    token_requests: AtomicUsize,
    classifiers: RwLock<HashMap<String, Value>>,
}

impl MockState {
    /// Authorized `/v*` requests served so far.
    pub fn api_requests(&self) -> usize {
        self.api_requests.load(Ordering::SeqCst)
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }
}

pub type Shared = Arc<MockState>;

#[derive(Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub apikey: String,
}

#[derive(Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

pub fn app() -> Router {
    app_with_state(Shared::default())
}

pub fn app_with_state(state: Shared) -> Router {
    let api = Router::new()
        .route("/v3/classify", post(classify))
        .route("/v3/classifiers", get(list_classifiers).post(create_classifier))
        .route(
            "/v3/classifiers/{classifier_id}",
            get(get_classifier).delete(delete_classifier),
        )
        .route("/v1/voices", get(list_voices))
        .route("/v1/synthesize", post(synthesize))
        .route("/v1/customizations/{customization_id}", delete(delete_customization))
        .route("/v3/echo", any(echo))
        .route("/v3/broken", get(broken))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/identity/token", post(issue_token))
        .merge(api)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: Shared) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn watson_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message, "code": status.as_u16()}))).into_response()
}

async fn require_auth(State(state): State<Shared>, request: Request, next: Next) -> Response {
    if !request.headers().contains_key(header::AUTHORIZATION) {
        return watson_error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    state.api_requests.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

async fn issue_token(State(state): State<Shared>, Form(input): Form<TokenRequest>) -> Response {
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    if input.grant_type != "urn:ibm:params:oauth:grant-type:apikey" {
        return watson_error(StatusCode::BAD_REQUEST, "unsupported grant_type");
    }
    if input.apikey == REJECTED_API_KEY {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "errorCode": "BXNIM0415E",
                "errorMessage": "Provided API key could not be found",
            })),
        )
            .into_response();
    }
    Json(json!({
        "access_token": format!("mock-token-{n}"),
        "refresh_token": "mock-refresh",
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<ReceivedPart>, Response> {
    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(watson_error(StatusCode::BAD_REQUEST, &e.body_text())),
        };
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| watson_error(StatusCode::BAD_REQUEST, &e.body_text()))?;
        parts.push(ReceivedPart {
            name,
            filename,
            content_type,
            content: String::from_utf8_lossy(&content).into_owned(),
        });
    }
    Ok(parts)
}

async fn classify(multipart: Multipart) -> Response {
    let parts = match read_parts(multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };
    let mut images = Vec::new();
    for part in &parts {
        match part.name.as_str() {
            "images_file" => {
                let image = part.filename.clone().unwrap_or_else(|| "image".to_string());
                let class = image.split('.').next().unwrap_or_default().to_string();
                images.push(json!({
                    "image": image,
                    "classifiers": [{
                        "name": "default",
                        "classifier_id": "default",
                        "classes": [{"class": class, "score": 0.93}],
                    }],
                }));
            }
            "url" => images.push(json!({
                "source_url": part.content,
                "resolved_url": part.content,
                "classifiers": [],
            })),
            _ => {}
        }
    }
    if images.is_empty() {
        return watson_error(StatusCode::BAD_REQUEST, "No images were specified.");
    }
    Json(json!({
        "custom_classes": 0,
        "images_processed": images.len(),
        "images": images,
        "received": parts,
    }))
    .into_response()
}

async fn list_classifiers(State(state): State<Shared>) -> Json<Value> {
    let classifiers = state.classifiers.read().await;
    Json(json!({"classifiers": classifiers.values().cloned().collect::<Vec<_>>()}))
}

async fn create_classifier(State(state): State<Shared>, multipart: Multipart) -> Response {
    let parts = match read_parts(multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };
    let Some(name) = parts.iter().find(|part| part.name == "name") else {
        return watson_error(StatusCode::BAD_REQUEST, "Missing required parameters: name");
    };
    let classes: Vec<Value> = parts
        .iter()
        .filter_map(|part| part.name.strip_suffix("_positive_examples"))
        .map(|class| json!({"class": class}))
        .collect();
    if classes.is_empty() {
        return watson_error(StatusCode::BAD_REQUEST, "Missing required parameters: positive_examples");
    }
    let classifier_id = format!("{}_{}", name.content, Uuid::new_v4().simple());
    let classifier = json!({
        "classifier_id": classifier_id,
        "name": name.content,
        "owner": "mock",
        "status": "training",
        "classes": classes,
    });
    state
        .classifiers
        .write()
        .await
        .insert(classifier_id, classifier.clone());
    Json(classifier).into_response()
}

async fn get_classifier(State(state): State<Shared>, Path(classifier_id): Path<String>) -> Response {
    let classifiers = state.classifiers.read().await;
    match classifiers.get(&classifier_id) {
        Some(classifier) => Json(classifier.clone()).into_response(),
        None => watson_error(StatusCode::NOT_FOUND, "Cannot find classifier"),
    }
}

async fn delete_classifier(State(state): State<Shared>, Path(classifier_id): Path<String>) -> Response {
    match state.classifiers.write().await.remove(&classifier_id) {
        Some(_) => Json(json!({})).into_response(),
        None => watson_error(StatusCode::NOT_FOUND, "Cannot find classifier"),
    }
}

async fn list_voices() -> Json<Value> {
    Json(json!({
        "voices": [{
            "name": "en-US_AllisonV3Voice",
            "language": "en-US",
            "gender": "female",
            "url": "/v1/voices/en-US_AllisonV3Voice",
            "description": "Allison: American English female voice.",
            "customizable": true,
        }],
    }))
}

/// Answers with `RIFF` followed by the text, typed as the requested format.
async fn synthesize(headers: HeaderMap, Json(input): Json<SynthesizeRequest>) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("audio/ogg;codecs=opus")
        .to_string();
    if !accept.starts_with("audio/") {
        return watson_error(StatusCode::NOT_ACCEPTABLE, "Unsupported Accept type");
    }
    let mut audio = b"RIFF".to_vec();
    audio.extend_from_slice(input.text.as_bytes());
    ([(header::CONTENT_TYPE, accept)], audio).into_response()
}

async fn delete_customization(Path(_customization_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Reflects the method, raw query and headers back as JSON.
async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap) -> Json<Value> {
    let headers: HashMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(json!({
        "method": method.as_str(),
        "query": query.unwrap_or_default(),
        "headers": headers,
    }))
}

async fn broken() -> Response {
    ([(header::CONTENT_TYPE, "application/json")], r#"{"images": ["#).into_response()
}
