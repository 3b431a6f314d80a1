//! Gateway behaviour against a real HTTP server.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use reqwest::Method;
use serde_json::{json, Value};

use yatri_client::{
    ApiError, Form, Gateway, MemoryCredentials, Payload, RequestOptions, Upload, CORRUPT_TOKEN,
};

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let h = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "authorization": h("authorization"),
        "contentType": h("content-type"),
        "xTrace": h("x-trace"),
    }))
}

async fn upload(headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let mut texts = Vec::new();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            let bytes = field.bytes().await.unwrap();
            files.push(json!({"name": name, "size": bytes.len()}));
        } else {
            let value = field.text().await.unwrap();
            texts.push(json!([name, value]));
        }
    }
    Json(json!({"contentType": content_type, "texts": texts, "files": files}))
}

async fn echo_query(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!(params))
}

fn app() -> Router {
    Router::new()
        .route("/ok-json", get(|| async { Json(json!({"success": true, "data": {"n": 1}})) }))
        .route("/ok-text", get(|| async { "pong" }))
        .route(
            "/fail-message",
            get(|| async {
                (StatusCode::BAD_REQUEST, Json(json!({"message": "Title is required"})))
                    .into_response()
            }),
        )
        .route(
            "/fail-no-message",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "nope"}))).into_response() }),
        )
        .route(
            "/fail-text",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down").into_response() }),
        )
        .route(
            "/fail-empty",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        )
        .route("/echo", get(echo_headers).post(echo_headers))
        .route("/toggle", patch(|| async { StatusCode::OK }))
        .route("/upload", post(upload))
        .route("/query", get(echo_query))
        .route(
            "/cookie/set",
            post(|| async { ([("set-cookie", "sid=abc123; Path=/")], StatusCode::OK) }),
        )
        .route(
            "/cookie/echo",
            get(|headers: HeaderMap| async move {
                let cookie = headers
                    .get("cookie")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({"cookie": cookie}))
            }),
        )
}

async fn start() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });
    format!("http://{}", addr)
}

fn gateway(base: &str, creds: MemoryCredentials) -> Gateway {
    Gateway::new(base, Arc::new(creds))
}

#[tokio::test]
async fn success_json_returned_unchanged() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let payload = gw.send("/ok-json", RequestOptions::default()).await.unwrap();
    assert_eq!(payload, Payload::Json(json!({"success": true, "data": {"n": 1}})));
}

#[tokio::test]
async fn success_text_returned_as_text() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let payload = gw.send("/ok-text", RequestOptions::default()).await.unwrap();
    assert_eq!(payload, Payload::Text("pong".into()));
}

#[tokio::test]
async fn error_json_uses_message_field() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let err = gw.send("/fail-message", RequestOptions::default()).await.unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Title is required");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn error_json_without_message_falls_back_to_status() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let err = gw.send("/fail-no-message", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Error: 404");
}

#[tokio::test]
async fn error_text_uses_raw_body() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let err = gw.send("/fail-text", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "upstream down");

    let err = gw.send("/fail-empty", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Error: 500");
}

#[tokio::test]
async fn bearer_attached_when_token_present() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::with_token("jwt-abc", Some("host")));
    let body: Value = gw.get("/echo").await.unwrap();
    assert_eq!(body["authorization"], "Bearer jwt-abc");
    assert_eq!(body["contentType"], "application/json");
}

#[tokio::test]
async fn no_bearer_without_token_or_with_corrupt_token() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let body: Value = gw.get("/echo").await.unwrap();
    assert!(body["authorization"].is_null());

    let gw = gateway(&base, MemoryCredentials::with_token(CORRUPT_TOKEN, None));
    let body: Value = gw.get("/echo").await.unwrap();
    assert!(body["authorization"].is_null());
}

#[tokio::test]
async fn extra_headers_forwarded() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let options = RequestOptions::new(Method::POST)
        .json(&json!({"a": 1}))
        .unwrap()
        .header("x-trace", "t-1");
    let body = gw.send("/echo", options).await.unwrap();
    assert_eq!(body.as_json().unwrap()["xTrace"], "t-1");
}

#[tokio::test]
async fn multipart_sets_boundary_content_type() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::with_token("jwt", None));
    let form = Form::new()
        .text("title", "Farm stay")
        .file("programImages", Upload::guess("a.png", vec![1, 2, 3]))
        .file("programImages", Upload::guess("b.jpg", vec![4, 5]));
    let body: Value = gw.post_form("/upload", form).await.unwrap();

    let ct = body["contentType"].as_str().unwrap();
    assert!(ct.starts_with("multipart/form-data; boundary="), "got {}", ct);
    assert_eq!(body["texts"], json!([["title", "Farm stay"]]));
    assert_eq!(body["files"].as_array().unwrap().len(), 2);
    assert_eq!(body["files"][0]["name"], "programImages");
    assert_eq!(body["files"][1]["size"], 2);
}

#[tokio::test]
async fn query_parameters_encoded() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let body: Value = gw
        .get_query("/query", &[("role", "all"), ("sortBy", "createdAt"), ("order", "DESC")])
        .await
        .unwrap();
    assert_eq!(body, json!({"role": "all", "sortBy": "createdAt", "order": "DESC"}));
}

#[tokio::test]
async fn empty_success_body_is_text() {
    let base = start().await;
    let gw = gateway(&base, MemoryCredentials::new());
    let payload = gw
        .send("/toggle", RequestOptions::new(Method::PATCH))
        .await
        .unwrap();
    assert_eq!(payload, Payload::Text(String::new()));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gw = gateway(&format!("http://{}", addr), MemoryCredentials::new());
    let err = gw.send("/ok-json", RequestOptions::default()).await.unwrap_err();
    assert!(err.is_network(), "got {:?}", err);
}

#[tokio::test]
async fn session_cookie_sent_on_later_calls() {
    let base = start().await;
    let gw = Gateway::try_new(&base, Arc::new(MemoryCredentials::new())).unwrap();
    gw.execute("/cookie/set", RequestOptions::new(Method::POST))
        .await
        .unwrap();
    let v: Value = gw.get("/cookie/echo").await.unwrap();
    assert_eq!(v["cookie"], "sid=abc123");

    // Clones share the jar.
    let v: Value = gw.clone().get("/cookie/echo").await.unwrap();
    assert_eq!(v["cookie"], "sid=abc123");
}
