// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{quiz, results, session},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quiz, sessions, results).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, identity provider, live sessions).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/questions", get(quiz::list_questions))
        .route("/categories", get(quiz::list_categories));

    // Every session action goes through the session's state machine
    let session_routes = Router::new()
        .route("/", post(session::create_session))
        .route(
            "/{id}",
            get(session::get_session).delete(session::delete_session),
        )
        .route("/{id}/sign-in", post(session::sign_in))
        .route("/{id}/sign-out", post(session::sign_out))
        .route("/{id}/start", post(session::start_quiz))
        .route("/{id}/answers", post(session::submit_answer))
        .route("/{id}/review", post(session::review_saved))
        .route("/{id}/compare", post(session::compare))
        .route("/{id}/back", post(session::back))
        .route("/{id}/home", post(session::home));

    let result_routes = Router::new().route("/{uid}", get(results::get_result));

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
