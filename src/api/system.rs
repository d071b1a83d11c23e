use axum::{Json, extract::State};
use std::sync::Arc;

use super::{
    ApiError, AppState,
    types::{ApiResponse, SystemStatus},
};

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let store = state.store();

    let venues = store
        .count_venues()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;
    let artists = store
        .count_artists()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;
    let shows = store
        .count_shows()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        venues,
        artists,
        shows,
    })))
}
