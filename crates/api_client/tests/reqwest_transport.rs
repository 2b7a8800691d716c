//! Run the reqwest transport against a local HTTP server

use std::{collections::HashMap, sync::Arc};

use api_client::{ApiClient, ApiError, ApiRequest, Configuration, HttpTransport, ReqwestTransport};
use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use url::Url;

async fn allowed_complaints(
    Path(course_id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let count = if query.get("teamMode").map(|v| v.as_str()) == Some("true") {
        course_id + 27
    } else {
        0
    };
    ([("Content-Version", "7.0.0")], Json(count))
}

async fn echo(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> impl IntoResponse {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(serde_json::json!({ "authorization": authorization, "body": body }))
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "missing")
}

async fn start_server() -> Url {
    let app = Router::new()
        .route("/api/courses/{course_id}/allowed-complaints", get(allowed_complaints))
        .route("/api/echo", post(echo))
        .route("/api/missing", get(missing));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{}/", address)).unwrap()
}

#[tokio::test]
async fn response_headers_and_body_are_returned() {
    let url = start_server().await;
    let transport = ReqwestTransport::new(Configuration::new(&url, None).unwrap());

    let response = transport
        .send(ApiRequest::get("api/courses/42/allowed-complaints").with_query("teamMode", true))
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.header("Content-Version"), Some(b"7.0.0".as_slice()));
    assert_eq!(response.json::<i64>().unwrap(), 69);
    assert!(response.url.ends_with("api/courses/42/allowed-complaints?teamMode=true"));
}

#[tokio::test]
async fn json_body_and_access_token_are_sent() {
    let url = start_server().await;
    let configuration = Configuration::new(&url, Some("artemis-client-test".to_string()))
        .unwrap()
        .with_access_token(Some("secret".to_string()));
    let client = ApiClient::new(Arc::new(ReqwestTransport::new(configuration)));

    let value: serde_json::Value = client
        .post_json("api/echo", &serde_json::json!({ "complaintText": "Test text" }))
        .await
        .unwrap();

    assert_eq!(value["authorization"], "Bearer secret");
    assert_eq!(value["body"]["complaintText"], "Test text");
}

#[tokio::test]
async fn error_status_is_reported_by_client() {
    let url = start_server().await;
    let client = ApiClient::new(Arc::new(ReqwestTransport::new(
        Configuration::new(&url, None).unwrap(),
    )));

    let error = client
        .get_json::<i64>(ApiRequest::get("api/missing"))
        .await
        .unwrap_err();

    assert_eq!(
        error.current_context(),
        &ApiError::ResponseStatus(http::StatusCode::NOT_FOUND)
    );
}
