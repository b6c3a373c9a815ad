#![allow(dead_code, unused_imports)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (u16, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_string(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, body_bytes.to_vec())
}

/// Deserialize `bytes` into `T`, panicking with a diagnostic message on failure.
fn deserialize_or_panic<T: DeserializeOwned>(status: u16, path: &str, bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        panic!(
            "Failed to deserialize response into {}\n\
             Status: {status} | Path: {path}\n\
             Error : {e}\n\
             Body  : {}",
            std::any::type_name::<T>(),
            String::from_utf8_lossy(bytes)
        )
    })
}

/// Helper to make JSON POST requests and deserialize response
pub async fn post_json<T: DeserializeOwned>(app: &Router, path: &str, body: Value) -> (u16, T) {
    let (status, bytes) = send(app, Method::POST, path, None, Some(body)).await;
    (status, deserialize_or_panic(status, path, &bytes))
}

/// Helper for GET requests with query parameters
pub async fn get_json<T: DeserializeOwned>(app: &Router, path: &str) -> (u16, T) {
    let (status, bytes) = send(app, Method::GET, path, None, None).await;
    (status, deserialize_or_panic(status, path, &bytes))
}

/// Authenticated request with an optional JSON body
pub async fn authed_json<T: DeserializeOwned>(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (u16, T) {
    let (status, bytes) = send(app, method, path, token, body).await;
    (status, deserialize_or_panic(status, path, &bytes))
}

/// Raw GET, for non-JSON bodies
pub async fn get_raw(app: &Router, path: &str) -> (u16, String) {
    let (status, bytes) = send(app, Method::GET, path, None, None).await;
    (status, String::from_utf8_lossy(&bytes).to_string())
}

/// POST with a verbatim body and content type, for malformed payloads
pub async fn post_raw<T: DeserializeOwned>(
    app: &Router,
    path: &str,
    content_type: &str,
    body: &str,
) -> (u16, T) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_owned()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, deserialize_or_panic(status, path, &bytes))
}
