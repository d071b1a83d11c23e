use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ApiError, AppState,
    types::{ApiResponse, ShowDto},
    validation,
};
use crate::models::show::NewShow;

/// Raw request body; ids and timestamp are validated in the handler so
/// that missing fields answer 400 instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateShowRequest {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: String,
}

pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    let store = state.store();
    let shows = store
        .list_shows()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let artist_ids: Vec<i32> = shows.iter().map(|s| s.artist_id).collect();
    let venue_ids: Vec<i32> = shows.iter().map(|s| s.venue_id).collect();

    let artists: HashMap<i32, (String, Option<String>)> = store
        .get_artists_by_ids(&artist_ids)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .into_iter()
        .map(|a| (a.id, (a.name, a.image_link)))
        .collect();
    let venues: HashMap<i32, (String, Option<String>)> = store
        .get_venues_by_ids(&venue_ids)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .into_iter()
        .map(|v| (v.id, (v.name, v.image_link)))
        .collect();

    let data: Vec<ShowDto> = shows
        .into_iter()
        .map(|show| {
            let (artist_name, artist_image_link) = artists
                .get(&show.artist_id)
                .cloned()
                .unwrap_or((String::new(), None));
            let (venue_name, venue_image_link) = venues
                .get(&show.venue_id)
                .cloned()
                .unwrap_or((String::new(), None));

            ShowDto {
                id: show.id,
                artist_id: show.artist_id,
                artist_name,
                artist_image_link,
                venue_id: show.venue_id,
                venue_name,
                venue_image_link,
                start_time: show.start_time.to_rfc3339(),
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(data)))
}

/// Creates a show. Both referenced rows must exist before the insert;
/// a dangling reference is a validation error, not a constraint fault.
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateShowRequest>,
) -> Result<Json<ApiResponse<ShowDto>>, ApiError> {
    validation::validate_entity_id("artist", payload.artist_id)?;
    validation::validate_entity_id("venue", payload.venue_id)?;

    let start_time = DateTime::parse_from_rfc3339(&payload.start_time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            ApiError::validation(format!(
                "Invalid start_time '{}': expected an RFC 3339 timestamp",
                payload.start_time
            ))
        })?;

    let store = state.store();

    let artist = store
        .get_artist(payload.artist_id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| {
            ApiError::validation(format!("Artist {} does not exist", payload.artist_id))
        })?;
    let venue = store
        .get_venue(payload.venue_id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| {
            ApiError::validation(format!("Venue {} does not exist", payload.venue_id))
        })?;

    let show = store
        .add_show(&NewShow {
            artist_id: artist.id,
            venue_id: venue.id,
            start_time,
        })
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(ShowDto {
        id: show.id,
        artist_id: artist.id,
        artist_name: artist.name,
        artist_image_link: artist.image_link,
        venue_id: venue.id,
        venue_name: venue.name,
        venue_image_link: venue.image_link,
        start_time: show.start_time.to_rfc3339(),
    })))
}
