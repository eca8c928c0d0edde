use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::service::files::{get_file_handler, list_files_handler};
use crate::service::upload::upload_ws_handler;
use crate::utils::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_origin.clone());

    Router::new()
        // Determine support
        .route("/", get(|| async { StatusCode::OK.into_response() }))
        .route("/ws", get(upload_ws_handler))
        .route("/files", get(list_files_handler))
        .route("/files/{id}", get(get_file_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// Credentials are allowed, so methods and headers are mirrored rather than `*`.
fn cors_layer(origin: String) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |request_origin, _| {
            request_origin.as_bytes() == origin.as_bytes()
        }))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
