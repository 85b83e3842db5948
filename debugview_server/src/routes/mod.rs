//! Route handlers for the debug server

pub mod api;
pub mod viewer;

use crate::{config::Config, store::Store, store::StoreError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use debugview_common::ErrorResponse;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Store::new(&config.data_dir, config.default_prefs_name());
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

/// Build the full router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::router())
        .merge(viewer::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// A store failure rendered as `{"error": ...}`
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("Store error: {}", self.0);
        } else {
            tracing::warn!("Rejected request: {}", self.0);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
