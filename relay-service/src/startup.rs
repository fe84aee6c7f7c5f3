use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{app::health_check, chat::chat_handler, metrics::metrics};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // CORS contract for the browser-facing caller. The layer also answers
    // OPTIONS preflights.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(cors)
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}
