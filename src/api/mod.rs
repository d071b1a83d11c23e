use axum::{
    Json, Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod artists;
mod assets;
mod error;
pub mod shows;
mod system;
mod types;
mod validation;
pub mod venues;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared).await)
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let api_router = Router::new()
        .route("/venues", get(venues::list_venues))
        .route("/venues", post(venues::create_venue))
        .route("/venues/search", post(venues::search_venues))
        .route(
            "/venues/{id}",
            get(venues::get_venue)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )
        .route("/artists", get(artists::list_artists))
        .route("/artists", post(artists::create_artist))
        .route("/artists/search", post(artists::search_artists))
        .route(
            "/artists/{id}",
            get(artists::get_artist)
                .put(artists::update_artist)
                .delete(artists::delete_artist),
        )
        .route("/shows", get(shows::list_shows))
        .route("/shows", post(shows::create_show))
        .route("/system/status", get(system::get_status))
        .fallback(api_not_found)
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .fallback(assets::serve_asset)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn api_not_found() -> (axum::http::StatusCode, Json<ApiResponse<()>>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(ApiResponse::error("Resource not found")),
    )
}
