use axum::{
    Json,
    extract::{Form, Path, State},
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ApiError, AppState,
    types::{
        ApiResponse, ArtistDetailDto, DirectoryEntryDto, SearchRequest, SearchResultsDto,
        ShowVenueDto,
    },
    validation,
};
use crate::models::artist::{Artist, ArtistChanges, NewArtist};

/// Flat artist directory ordered by name. Unlike venues, artists are
/// not grouped by location.
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DirectoryEntryDto>>>, ApiError> {
    let store = state.store();
    let artists = store
        .list_artists()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;
    let counts = store
        .upcoming_show_counts_by_artist(Utc::now())
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let data: Vec<DirectoryEntryDto> = artists
        .into_iter()
        .map(|artist| DirectoryEntryDto {
            id: artist.id,
            name: artist.name,
            num_upcoming_shows: counts.get(&artist.id).copied().unwrap_or(0),
        })
        .collect();

    Ok(Json(ApiResponse::success(data)))
}

pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let term = validation::validate_search_term(&payload.search_term)?;

    let store = state.store();
    let artists = store
        .search_artists(term)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;
    let counts = store
        .upcoming_show_counts_by_artist(Utc::now())
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let data: Vec<DirectoryEntryDto> = artists
        .into_iter()
        .map(|artist| DirectoryEntryDto {
            id: artist.id,
            name: artist.name,
            num_upcoming_shows: counts.get(&artist.id).copied().unwrap_or(0),
        })
        .collect();

    Ok(Json(ApiResponse::success(SearchResultsDto {
        count: data.len(),
        data,
    })))
}

pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ArtistDetailDto>>, ApiError> {
    validation::validate_entity_id("artist", id)?;

    let store = state.store();
    let artist = store
        .get_artist(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::artist_not_found(id))?;

    let shows = store
        .shows_for_artist(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let venue_ids: Vec<i32> = shows.iter().map(|s| s.venue_id).collect();
    let venues: HashMap<i32, (String, Option<String>)> = store
        .get_venues_by_ids(&venue_ids)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .into_iter()
        .map(|v| (v.id, (v.name, v.image_link)))
        .collect();

    let now = Utc::now();
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for show in shows {
        let (venue_name, venue_image_link) = venues
            .get(&show.venue_id)
            .cloned()
            .unwrap_or((String::new(), None));
        let dto = ShowVenueDto {
            venue_id: show.venue_id,
            venue_name,
            venue_image_link,
            start_time: show.start_time.to_rfc3339(),
        };

        if show.is_upcoming(now) {
            upcoming_shows.push(dto);
        } else {
            past_shows.push(dto);
        }
    }

    Ok(Json(ApiResponse::success(ArtistDetailDto {
        id: artist.id,
        name: artist.name,
        city: artist.city,
        state: artist.state,
        phone: artist.phone,
        image_link: artist.image_link,
        facebook_link: artist.facebook_link,
        genres: artist.genres,
        website: artist.website,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        num_past_shows: past_shows.len(),
        num_upcoming_shows: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })))
}

pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewArtist>,
) -> Result<Json<ApiResponse<Artist>>, ApiError> {
    validation::validate_required("name", &payload.name)?;
    validation::validate_required("city", &payload.city)?;
    validation::validate_required("state", &payload.state)?;

    let artist = state
        .store()
        .add_artist(&payload)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(artist)))
}

pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ArtistChanges>,
) -> Result<Json<ApiResponse<Artist>>, ApiError> {
    validation::validate_entity_id("artist", id)?;
    if let Some(name) = &payload.name {
        validation::validate_required("name", name)?;
    }

    let artist = state
        .store()
        .update_artist(id, &payload)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::artist_not_found(id))?;

    Ok(Json(ApiResponse::success(artist)))
}

pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_entity_id("artist", id)?;

    let removed = state
        .store()
        .remove_artist(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !removed {
        return Err(ApiError::artist_not_found(id));
    }

    Ok(Json(ApiResponse::success(())))
}
