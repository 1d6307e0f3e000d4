//! Axum router construction.

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    middleware::from_fn,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// A method that a known path does not support falls through to the same
/// `404 Not found` as an unknown path. `HEAD` is not served implicitly by the
/// `GET` route.
pub fn build(state: AppState) -> Router {
    build_with_timeout(state, middleware::REQUEST_TIMEOUT)
}

fn build_with_timeout(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos)
                .post(handlers::create_todo)
                .head(handlers::not_found)
                .fallback(handlers::not_found),
        )
        .route(
            "/todos/*rest",
            delete(handlers::delete_todo).fallback(handlers::not_found),
        )
        .fallback(handlers::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handlers::handle_middleware_error))
                .timeout(timeout),
        )
        .layer(from_fn(middleware::response_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
