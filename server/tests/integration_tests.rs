use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tasklist_server::config::{Config, StorageBackend};
use tasklist_server::setup::initialize_app;
use tempfile::TempDir;
use tower::ServiceExt;
use web_api::TaskServer;

async fn send(server: &TaskServer, request: Request<Body>) -> (StatusCode, Value) {
    let response = server.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn request(method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.server.listen_addr = "127.0.0.1".to_string();
    config.database.connect_attempts = 2;
    config.database.retry_delay_ms = 0;
    config
}

#[tokio::test]
async fn test_server_startup_with_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("data").join("tasks.db");

    let mut config = quiet_config();
    config.database.url = Some(format!("sqlite://{}", db_path.display()));

    let server = initialize_app(&config).await.unwrap();
    assert!(db_path.exists());

    let (status, created) = send(
        &server,
        request(Method::POST, "/api/tasks", Some(r#"{"title":"Ship it"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A second startup against the same file keeps the data
    let server = initialize_app(&config).await.unwrap();
    let (status, tasks) = send(&server, request(Method::GET, "/api/tasks", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks, json!([created]));

    let (status, health) = send(&server, request(Method::GET, "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_server_startup_with_seeded_memory() {
    let mut config = quiet_config();
    config.storage.backend = StorageBackend::Memory;
    config.storage.seed_sample_tasks = true;

    let server = initialize_app(&config).await.unwrap();
    let (status, tasks) = send(&server, request(Method::GET, "/api/tasks", None)).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|task: &Value| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, database::SAMPLE_TASKS.to_vec());
}

#[tokio::test]
async fn test_startup_fails_without_database_url() {
    let config = quiet_config();

    let error = initialize_app(&config).await.err().unwrap();
    let chain = format!("{error:#}");
    assert!(chain.contains("Failed to create repository"), "{chain}");
    assert!(chain.contains("DATABASE_URL"), "{chain}");
}

#[test]
fn test_configuration_loading() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.server_address().unwrap().to_string(), "0.0.0.0:5000");
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
}
