//! Axum request handlers for all service endpoints.

use axum::{
    body::Body,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    BoxError, Json,
};
use common::protocol::{CreateTodoResponse, DeleteTodoResponse, ErrorResponse};
use common::ServiceError;
use tracing::{debug, error, info, warn};

use super::body::{read_bounded, BodyError, MAX_BODY_BYTES};
use super::state::AppState;
use crate::validation::{
    parse_new_todo, parse_todo_id, todo_id_segment, INVALID_TODO, TODO_NOT_FOUND,
};

/// `GET /todos` — every todo in ascending id order.
pub async fn list_todos(State(state): State<AppState>) -> Response {
    match state.with_store(|s| s.list()).await {
        Ok(todos) => (StatusCode::OK, Json(todos)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list todos");
            error_response(&e.into())
        }
    }
}

/// `POST /todos` — validate, sanitise and insert a todo.
///
/// The body is capped at [`MAX_BODY_BYTES`]; crossing the cap returns `413`
/// and the body is not parsed. Every other failure, storage included, is
/// reported as `400 Invalid todo`.
pub async fn create_todo(State(state): State<AppState>, body: Body) -> Response {
    let bytes = match read_bounded(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(BodyError::TooLarge { limit }) => {
            warn!(limit, "rejecting oversized request body");
            return error_response(&ServiceError::PayloadTooLarge { limit });
        }
        Err(e) => {
            debug!(error = %e, "request body read failed");
            return error_response(&ServiceError::Validation(INVALID_TODO.into()));
        }
    };

    let text = match parse_new_todo(&bytes) {
        Ok(t) => t,
        Err(e) => {
            debug!(error = %e, "rejected todo");
            return error_response(&e);
        }
    };

    let inserted = state
        .with_store(move |s| {
            let id = s.insert(&text)?;
            let todos = s.list()?;
            Ok((id, todos))
        })
        .await;

    match inserted {
        Ok((id, todos)) => {
            info!(id, "todo created");
            let body = CreateTodoResponse {
                success: true,
                id,
                todos,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(e) => {
            // Storage failures on this path are reported like validation failures.
            error!(error = %e, "failed to insert todo");
            error_response(&ServiceError::Validation(INVALID_TODO.into()))
        }
    }
}

/// `DELETE /todos/{id}` — remove one todo.
///
/// The id is the first segment after `/todos/`; anything past it is ignored.
pub async fn delete_todo(State(state): State<AppState>, uri: Uri) -> Response {
    let segment = todo_id_segment(uri.path());
    let id = match parse_todo_id(segment) {
        Ok(id) => id,
        Err(e) => {
            debug!(error = %e, segment, "rejected todo id");
            return error_response(&e);
        }
    };

    let outcome = state
        .with_store(move |s| {
            if s.delete(id)? == 0 {
                return Ok(None);
            }
            s.list().map(Some)
        })
        .await;

    match outcome {
        Ok(Some(todos)) => {
            info!(id, "todo deleted");
            let body = DeleteTodoResponse {
                success: true,
                todos,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(None) => error_response(&ServiceError::NotFound(TODO_NOT_FOUND.into())),
        Err(e) => {
            error!(error = %e, id, "failed to delete todo");
            error_response(&e.into())
        }
    }
}

/// 404 handler for unsupported methods on known paths.
pub async fn not_found() -> Response {
    error_response(&ServiceError::NotFound("Not found".into()))
}

/// Router-wide fallback.
///
/// `DELETE /todos/` carries an empty id that the `/todos/*rest` route does not
/// capture, so it is handed to [`delete_todo`] and rejected there like any
/// other unparseable id. Everything else is `404 Not found`.
pub async fn fallback(state: State<AppState>, method: Method, uri: Uri) -> Response {
    if method == Method::DELETE && uri.path().starts_with("/todos/") {
        return delete_todo(state, uri).await;
    }
    not_found().await
}

/// Render errors raised by the tower layers (the request deadline) as JSON.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("request exceeded deadline");
        return error_response(&ServiceError::Timeout);
    }
    error!(error = %err, "unhandled middleware error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
        .into_response()
}

/// Render a [`ServiceError`] as its status code and `{"error": ...}` body.
fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.client_message()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        http::Request,
        routing::{delete, get},
        Router,
    };
    use common::protocol::Todo;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::store::{MockTodoStore, StoreError};

    fn test_router(mock: MockTodoStore) -> Router {
        Router::new()
            .route("/todos", get(list_todos).post(create_todo))
            .route("/todos/*rest", delete(delete_todo))
            .fallback(fallback)
            .with_state(AppState::new(Arc::new(mock)))
    }

    async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_owned()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_failure_returns_500() {
        let mut mock = MockTodoStore::new();
        mock.expect_list()
            .returning(|| Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery)));

        let (status, body) = send(test_router(mock), "GET", "/todos", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Database error"}));
    }

    #[tokio::test]
    async fn insert_failure_collapses_to_invalid_todo() {
        let mut mock = MockTodoStore::new();
        mock.expect_insert().returning(|_| Err(StoreError::Poisoned));
        mock.expect_list().never();

        let (status, body) = send(test_router(mock), "POST", "/todos", r#"{"todo":"ok"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Invalid todo"}));
    }

    #[tokio::test]
    async fn invalid_body_never_touches_store() {
        let mut mock = MockTodoStore::new();
        mock.expect_insert().never();

        let (status, body) = send(test_router(mock), "POST", "/todos", r#"{"todo":123}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid todo");
    }

    #[tokio::test]
    async fn oversized_body_never_touches_store() {
        let mut mock = MockTodoStore::new();
        mock.expect_insert().never();

        let big = format!(r#"{{"todo":"{}"}}"#, "x".repeat(MAX_BODY_BYTES));
        let (status, body) = send(test_router(mock), "POST", "/todos", &big).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Payload too large");
    }

    #[tokio::test]
    async fn create_passes_sanitised_text_to_store() {
        let mut mock = MockTodoStore::new();
        mock.expect_insert()
            .withf(|text: &str| text == "a &amp; b")
            .times(1)
            .returning(|_| Ok(5));
        mock.expect_list().returning(|| {
            Ok(vec![Todo {
                id: 5,
                todo: "a &amp; b".into(),
            }])
        });

        let (status, body) = send(test_router(mock), "POST", "/todos", r#"{"todo":" a & b "}"#).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 5);
        assert_eq!(body["todos"][0]["todo"], "a &amp; b");
    }

    #[tokio::test]
    async fn delete_failure_returns_500() {
        let mut mock = MockTodoStore::new();
        mock.expect_delete().returning(|_| Err(StoreError::Poisoned));

        let (status, body) = send(test_router(mock), "DELETE", "/todos/3", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database error");
    }

    #[tokio::test]
    async fn delete_of_missing_row_skips_relist() {
        let mut mock = MockTodoStore::new();
        mock.expect_delete().returning(|_| Ok(0));
        mock.expect_list().never();

        let (status, body) = send(test_router(mock), "DELETE", "/todos/99", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Todo not found");
    }

    #[tokio::test]
    async fn bad_id_never_touches_store() {
        let mut mock = MockTodoStore::new();
        mock.expect_delete().never();

        let (status, body) = send(test_router(mock), "DELETE", "/todos/abc", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid ID");
    }

    #[tokio::test]
    async fn empty_id_is_invalid_without_touching_store() {
        let mut mock = MockTodoStore::new();
        mock.expect_delete().never();

        let (status, body) = send(test_router(mock), "DELETE", "/todos/", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid ID");
    }

    #[tokio::test]
    async fn delete_uses_leading_digits_of_first_segment() {
        let mut mock = MockTodoStore::new();
        mock.expect_delete()
            .withf(|id: &i64| *id == 2)
            .times(2)
            .returning(|_| Ok(1));
        mock.expect_list().returning(|| Ok(Vec::new()));

        let app = test_router(mock);
        let (status, _) = send(app.clone(), "DELETE", "/todos/2abc", "").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(app, "DELETE", "/todos/2/extra", "").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn overflowing_id_is_404_without_touching_store() {
        let mut mock = MockTodoStore::new();
        mock.expect_delete().never();

        let (status, body) =
            send(test_router(mock), "DELETE", "/todos/99999999999999999999", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Todo not found");
    }

    #[tokio::test]
    async fn elapsed_deadline_renders_408_json() {
        let resp = handle_middleware_error(Box::new(tower::timeout::error::Elapsed::new())).await;
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Request timeout"}));
    }
}
