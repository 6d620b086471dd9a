//! HTTP server for the task list
//!
//! JSON task API, health check, and the server-rendered page with its script.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use handlebars::TemplateError;
use std::{future::Future, net::SocketAddr, sync::Arc};
use task_core::{Task, TaskRepository};
use tracing::info;

use crate::{
    dto::{CreateTaskRequest, HealthResponse, ListTasksQuery, StatusResponse},
    error::ApiError,
    handler::TaskHandler,
    page::{IndexPage, MAIN_JS},
};

/// Shared server state for handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: TaskHandler,
    pub page: Arc<IndexPage>,
}

impl AppState {
    /// State serving the bundled page
    pub fn new(repository: Arc<dyn TaskRepository>) -> Result<Self, TemplateError> {
        Ok(Self::with_page(repository, IndexPage::new()?))
    }

    pub fn with_page(repository: Arc<dyn TaskRepository>, page: IndexPage) -> Self {
        Self {
            handler: TaskHandler::new(repository),
            page: Arc::new(page),
        }
    }
}

/// Task list HTTP server
pub struct TaskServer {
    state: AppState,
}

impl TaskServer {
    /// Create a server backed by the given repository
    pub fn new(repository: Arc<dyn TaskRepository>) -> Result<Self, TemplateError> {
        Ok(Self {
            state: AppState::new(repository)?,
        })
    }

    /// Router with every endpoint, for serving or for driving in tests
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Serve until the process is killed
    pub async fn serve(self, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, letting in-flight requests finish
    pub async fn serve_with_shutdown<F>(
        self,
        addr: SocketAddr,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();

        info!("Starting task list server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Task list server stopped");
        Ok(())
    }
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/main.js", get(script_handler))
        .route("/api/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/api/tasks/:id",
            patch(toggle_task_handler).delete(delete_task_handler),
        )
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(
            crate::request_logger::request_logging_middleware,
        ))
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state
        .page
        .render()
        .map(Html)
        .map_err(|e| ApiError::Render(e.to_string()))
}

async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        MAIN_JS,
    )
}

async fn list_tasks_handler(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    // Repeated or undecodable parameters never fail the listing
    let pairs = match query {
        Ok(Query(pairs)) => pairs,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignoring unreadable query string");
            Vec::new()
        }
    };
    let tasks = state
        .handler
        .list_tasks(ListTasksQuery::from_pairs(pairs))
        .await?;
    Ok(Json(tasks))
}

async fn create_task_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    // Any body that is not a JSON object with a string title gets the same 400
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected task body");
        ApiError::TitleRequired
    })?;

    let task = state.handler.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn toggle_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.handler.toggle_task(&id).await?;
    Ok(Json(task))
}

async fn delete_task_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.handler.delete_task(&id).await?;
    Ok(Json(StatusResponse::deleted()))
}

async fn health_handler(State(state): State<AppState>) -> Response {
    match state.handler.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::ok())).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse::error(err.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::task_core::error::Result;
    use ::task_core::{NewTask, TaskError, TaskFilter};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mockall::mock;
    use mockall::predicate::*;
    use tower::ServiceExt;

    mock! {
        TestRepository {}

        #[async_trait]
        impl TaskRepository for TestRepository {
            async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>>;
            async fn create(&self, task: NewTask) -> Result<Task>;
            async fn toggle(&self, id: i64) -> Result<Task>;
            async fn delete(&self, id: i64) -> Result<()>;
            async fn health_check(&self) -> Result<()>;
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_server_creation() {
        let mock_repo = Arc::new(MockTestRepository::new());
        let _server = TaskServer::new(mock_repo).unwrap();
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let mut mock_repo = MockTestRepository::new();
        mock_repo
            .expect_health_check()
            .times(1)
            .returning(|| Err(TaskError::Connection("Database unreachable".to_string())));

        let router = TaskServer::new(Arc::new(mock_repo)).unwrap().router();
        let (status, body) = send(router, get_request("/health")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("Database unreachable"));
    }

    #[tokio::test]
    async fn test_list_storage_failure_is_generic_500() {
        let mut mock_repo = MockTestRepository::new();
        mock_repo
            .expect_list()
            .with(eq(TaskFilter::by_category("ops")))
            .times(1)
            .returning(|_| Err(TaskError::Database("no such table: tasks".to_string())));

        let router = TaskServer::new(Arc::new(mock_repo)).unwrap().router();
        let (status, body) = send(router, get_request("/api/tasks?category=ops")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_empty_category_means_no_filter() {
        let mut mock_repo = MockTestRepository::new();
        mock_repo
            .expect_list()
            .with(eq(TaskFilter::all()))
            .times(1)
            .returning(|_| Ok(vec![]));

        let router = TaskServer::new(Arc::new(mock_repo)).unwrap().router();
        let (status, body) = send(router, get_request("/api/tasks?category=")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_repeated_category_uses_first_value() {
        let mut mock_repo = MockTestRepository::new();
        mock_repo
            .expect_list()
            .with(eq(TaskFilter::by_category("ops")))
            .times(1)
            .returning(|_| Ok(vec![]));

        let router = TaskServer::new(Arc::new(mock_repo)).unwrap().router();
        let (status, body) =
            send(router, get_request("/api/tasks?category=ops&category=x")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_index_render_failure_is_500() {
        let page = IndexPage::from_template("{{missing_value}}").unwrap();
        let state = AppState::with_page(Arc::new(MockTestRepository::new()), page);

        let (status, body) = send(create_router(state), get_request("/")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
