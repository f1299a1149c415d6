use awesomefacts_api::router;
use awesomefacts_core::{
    FactService, FactStore, JsonFactRepository, SqliteFactRepository, StorageConfig, StorageKind,
};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn sqlite_app() -> Router {
    router(FactService::new(
        SqliteFactRepository::open_in_memory().unwrap(),
    ))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(app, method, uri, body).await;
    (status, body)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

#[tokio::test]
async fn create_returns_created_with_location_and_camel_case_body() {
    let app = sqlite_app();

    let (status, headers, body) = send_raw(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({ "text": "Sky is blue", "category": "Nature", "isVerified": true })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/api/facts/1");
    assert_eq!(body["id"], 1);
    assert_eq!(body["text"], "Sky is blue");
    assert_eq!(body["category"], "Nature");
    assert_eq!(body["isVerified"], true);
    assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn crud_scenario_over_http() {
    let app = sqlite_app();

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({ "text": "Sky is blue", "category": "Nature", "isVerified": true })),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/facts/1",
        Some(json!({ "text": "Sky is blue-ish", "category": "Nature", "isVerified": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["text"], "Sky is blue-ish");
    assert_eq!(updated["isVerified"], false);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, listed) = send(&app, Method::GET, "/api/facts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([updated]));

    let (status, body) = send(&app, Method::DELETE, "/api/facts/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, "/api/facts/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn misses_map_to_not_found() {
    let app = sqlite_app();

    let (status, _) = send(&app, Method::GET, "/api/facts/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/facts/999",
        Some(json!({ "text": "x", "category": "y", "isVerified": false })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/facts/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, Method::GET, "/api/facts", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn blank_required_fields_are_rejected_before_storage() {
    let app = sqlite_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({ "text": "   ", "category": "Nature" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["message"], "text is required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({ "text": "Sky is blue", "category": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, Method::GET, "/api/facts", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn client_supplied_id_and_created_at_are_ignored() {
    let app = sqlite_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({
            "id": 77,
            "text": "Honey never spoils",
            "category": "Food",
            "createdAt": "1999-01-01T00:00:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["isVerified"], false);
    assert_ne!(body["createdAt"], "1999-01-01T00:00:00Z");
}

#[tokio::test]
async fn json_backend_serves_the_same_contract() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new(StorageKind::Json, dir.path().join("facts.json"));
    let app = router(FactService::new(FactStore::open(&config).unwrap()));

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({ "text": "Sky is blue", "category": "Nature", "isVerified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let reopened = JsonFactRepository::open(dir.path().join("facts.json")).unwrap();
    assert_eq!(reopened.len(), 1);
}

#[tokio::test]
async fn health_reports_version() {
    let app = sqlite_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(!body["version"].as_str().unwrap().is_empty());
}

async fn send_text(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn storage_fault_returns_generic_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFactRepository::open(dir.path().join("facts.json")).unwrap();
    let path = repo.path().to_path_buf();
    let app = router(FactService::new(repo));

    // A directory at the data path makes the rewrite fail.
    std::fs::create_dir(&path).unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/facts",
        Some(json!({ "text": "Sky is blue", "category": "Nature" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "storage_error");
    assert_eq!(body["message"], "storage backend failure");
    assert!(!body.to_string().contains(path.to_str().unwrap()));

    let (status, listed) = send(&app, Method::GET, "/api/facts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_body_gets_json_error_shape() {
    let app = sqlite_app();

    let (status, body) = send_text(&app, Method::POST, "/api/facts", "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
    assert!(!body["message"].as_str().unwrap().is_empty());

    let (status, body) = send_text(&app, Method::PUT, "/api/facts/1", r#"{"text": 5}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_request");

    let (_, listed) = send(&app, Method::GET, "/api/facts", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn non_integer_id_gets_json_error_shape() {
    let app = sqlite_app();

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&app, method, "/api/facts/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
    }
}
