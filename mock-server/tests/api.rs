use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState, ReceivedPart};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authorized(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, "Bearer test")
}

fn multipart(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )),
            None => body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<String> {
    authorized("POST", uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart(parts))
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_authorization_is_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/voices").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn token_endpoint_issues_bearer_tokens() {
    let state = Arc::new(MockState::default());
    let resp = app_with_state(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/identity/token")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(
                    "grant_type=urn%3Aibm%3Aparams%3Aoauth%3Agrant-type%3Aapikey&apikey=k&response_type=cloud_iam"
                        .to_string(),
                )
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["access_token"], "mock-token-1");
    assert_eq!(body["expires_in"], 3600);
    assert_eq!(state.token_requests(), 1);
    assert_eq!(state.api_requests(), 0);
}

#[tokio::test]
async fn revoked_key_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/identity/token")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(format!(
                    "grant_type=urn%3Aibm%3Aparams%3Aoauth%3Agrant-type%3Aapikey&apikey={}",
                    mock_server::REJECTED_API_KEY
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- classify ---

#[tokio::test]
async fn classify_echoes_received_parts() {
    let resp = app()
        .oneshot(multipart_request(
            "/v3/classify",
            &[("images_file", Some("turtle.jpg"), "JPEG"), ("threshold", None, "0.6")],
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["images"][0]["classifiers"][0]["classes"][0]["class"], "turtle");
    let received: Vec<ReceivedPart> = serde_json::from_value(body["received"].clone()).unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].filename.as_deref(), Some("turtle.jpg"));
    assert_eq!(received[1].content, "0.6");
}

#[tokio::test]
async fn classify_without_images_is_400() {
    let resp = app()
        .oneshot(multipart_request("/v3/classify", &[("threshold", None, "0.6")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- classifiers ---

#[tokio::test]
async fn classifier_lifecycle() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(multipart_request(
            "/v3/classifiers",
            &[
                ("name", None, "dogs"),
                ("beagle_positive_examples", Some("beagle.zip"), "PK"),
                ("husky_positive_examples", Some("husky.zip"), "PK"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    assert_eq!(created["name"], "dogs");
    assert_eq!(created["classes"].as_array().unwrap().len(), 2);
    let id = created["classifier_id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(authorized("GET", &format!("/v3/classifiers/{id}")).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(authorized("DELETE", &format!("/v3/classifiers/{id}")).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(authorized("GET", &format!("/v3/classifiers/{id}")).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Cannot find classifier");
}

// --- text to speech ---

#[tokio::test]
async fn synthesize_returns_audio_of_requested_type() {
    let resp = app()
        .oneshot(
            authorized("POST", "/v1/synthesize")
                .header(http::header::CONTENT_TYPE, "application/json")
                .header(http::header::ACCEPT, "audio/wav")
                .body(r#"{"text":"hi"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "audio/wav");
    assert_eq!(&body_bytes(resp).await[..], b"RIFFhi");
}

#[tokio::test]
async fn delete_customization_is_204_with_empty_body() {
    let resp = app()
        .oneshot(authorized("DELETE", "/v1/customizations/abc").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

// --- diagnostics ---

#[tokio::test]
async fn echo_reflects_query_and_headers() {
    let resp = app()
        .oneshot(
            authorized("GET", "/v3/echo?version=2018-03-19&verbose=true")
                .header("X-Custom", "1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["method"], "GET");
    assert_eq!(body["query"], "version=2018-03-19&verbose=true");
    assert_eq!(body["headers"]["x-custom"], "1");
}

#[tokio::test]
async fn broken_returns_truncated_json() {
    let resp = app()
        .oneshot(authorized("GET", "/v3/broken").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}
