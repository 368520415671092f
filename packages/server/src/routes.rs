//! Task API Endpoints
//!
//! Thin HTTP layer over the task record store. All decisions live in
//! `taskdeck-core`; handlers only translate between HTTP and the store's
//! request/response contract.
//!
//! # Endpoints
//!
//! - `POST /api/tasks` - Create a task (201 + record)
//! - `GET /api/tasks` - List all tasks
//! - `PATCH /api/tasks/:id` - Partial update
//! - `DELETE /api/tasks/:id` - Delete a task
//! - `GET /api/health` - Health check

use axum::{
    extract::{Path, State},
    http::{header::HeaderValue, Method, StatusCode},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::http_error::HttpError;
use taskdeck_core::{Task, TaskFields, TaskService};

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TaskService>,
}

/// Response for the list endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub count: usize,
}

/// Response for the delete endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:5000/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create a new task
///
/// Body: any subset of `{title, priority, completed, tags, metadata}`;
/// `title` is required. Returns 201 with the materialized record.
async fn create_task(
    State(state): State<AppState>,
    Json(fields): Json<TaskFields>,
) -> Result<(StatusCode, Json<Task>), HttpError> {
    let task = state.service.create_task(fields).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// List every task via full table scan
///
/// No pagination; callers re-sort client-side (e.g. createdAt descending).
async fn list_tasks(State(state): State<AppState>) -> Result<Json<TaskListResponse>, HttpError> {
    let tasks = state.service.list_tasks().await?;
    let count = tasks.len();
    Ok(Json(TaskListResponse { tasks, count }))
}

/// Partially update a task
///
/// Body: any subset of the mutable fields; absent fields are left
/// untouched. Returns the table-confirmed post-update record.
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<TaskFields>,
) -> Result<Json<Task>, HttpError> {
    let task = state.service.update_task(&id, fields).await?;
    Ok(Json(task))
}

/// Delete a task by id
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let deleted = state.service.delete_task(&id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", post(create_task).get(list_tasks))
        .route("/api/tasks/:id", patch(update_task).delete(delete_task))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Create the CORS layer
///
/// Open by default (the API fronts a demo client); a single origin can be
/// pinned via the CORS_ALLOW_ORIGIN environment variable. A value that does
/// not parse as a header is logged and ignored rather than aborting startup.
fn cors_layer() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => layer.allow_origin(origin),
            Err(_) => {
                warn!(origin = %origin, "Ignoring malformed CORS_ALLOW_ORIGIN, allowing any origin");
                layer.allow_origin(Any)
            }
        },
        Err(_) => layer.allow_origin(Any),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use taskdeck_core::MemoryTable;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let service = Arc::new(TaskService::new(Arc::new(MemoryTable::new())));
        create_router(AppState { service })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_cors_layer_tolerates_malformed_origin() {
        std::env::set_var("CORS_ALLOW_ORIGIN", "not\na\nheader");
        let _ = cors_layer();
        std::env::remove_var("CORS_ALLOW_ORIGIN");
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_task_returns_201_with_defaults() {
        let response = test_router()
            .oneshot(json_request(
                "POST",
                "/api/tasks",
                json!({"title": "Ship release"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let task = body_json(response).await;
        assert_eq!(task["title"], "Ship release");
        assert_eq!(task["priority"], 3);
        assert_eq!(task["completed"], false);
        assert!(!task["id"].as_str().unwrap().is_empty());
        assert!(!task["createdAt"].as_str().unwrap().is_empty());
        assert!(task.get("updatedAt").is_none());
    }

    #[tokio::test]
    async fn test_create_task_rejects_blank_title() {
        let response = test_router()
            .oneshot(json_request("POST", "/api/tasks", json!({"title": "  "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_tasks() {
        let router = test_router();

        router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/tasks",
                json!({"title": "a", "tags": ["urgent"]}),
            ))
            .await
            .unwrap();
        router
            .clone()
            .oneshot(json_request("POST", "/api/tasks", json!({"title": "b"})))
            .await
            .unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["tasks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_task_partial() {
        let router = test_router();

        let created = body_json(
            router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/tasks",
                    json!({"title": "a", "tags": ["keep"]}),
                ))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(json_request(
                "PATCH",
                &format!("/api/tasks/{}", id),
                json!({"completed": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let task = body_json(response).await;
        assert_eq!(task["completed"], true);
        assert_eq!(task["title"], "a");
        assert_eq!(task["tags"], json!(["keep"]));
        assert!(!task["updatedAt"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_task_returns_404() {
        let response = test_router()
            .oneshot(json_request(
                "PATCH",
                "/api/tasks/no-such-id",
                json!({"title": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "TASK_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_with_no_fields_returns_400() {
        let router = test_router();

        let created = body_json(
            router
                .clone()
                .oneshot(json_request("POST", "/api/tasks", json!({"title": "a"})))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let response = router
            .oneshot(json_request(
                "PATCH",
                &format!("/api/tasks/{}", id),
                json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_delete_task_then_404() {
        let router = test_router();

        let created = body_json(
            router
                .clone()
                .oneshot(json_request("POST", "/api/tasks", json!({"title": "a"})))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/tasks/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["deleted"], id);

        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/tasks/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
