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
        ApiResponse, DirectoryEntryDto, SearchRequest, SearchResultsDto, ShowArtistDto,
        VenueAreaDto, VenueDetailDto,
    },
    validation,
};
use crate::models::venue::{NewVenue, Venue, VenueChanges};

/// All venues grouped by (city, state), each with its count of upcoming
/// shows. Relies on the store returning rows ordered by location.
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<VenueAreaDto>>>, ApiError> {
    let store = state.store();
    let venues = store
        .list_venues()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;
    let counts = store
        .upcoming_show_counts_by_venue(Utc::now())
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let mut areas: Vec<VenueAreaDto> = Vec::new();
    for venue in venues {
        let entry = DirectoryEntryDto {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
        };

        match areas.last_mut() {
            Some(area) if area.city == venue.city && area.state == venue.state => {
                area.venues.push(entry);
            }
            _ => areas.push(VenueAreaDto {
                city: venue.city,
                state: venue.state,
                venues: vec![entry],
            }),
        }
    }

    Ok(Json(ApiResponse::success(areas)))
}

pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let term = validation::validate_search_term(&payload.search_term)?;

    let store = state.store();
    let venues = store
        .search_venues(term)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;
    let counts = store
        .upcoming_show_counts_by_venue(Utc::now())
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let data: Vec<DirectoryEntryDto> = venues
        .into_iter()
        .map(|venue| DirectoryEntryDto {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
        })
        .collect();

    Ok(Json(ApiResponse::success(SearchResultsDto {
        count: data.len(),
        data,
    })))
}

pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VenueDetailDto>>, ApiError> {
    validation::validate_entity_id("venue", id)?;

    let store = state.store();
    let venue = store
        .get_venue(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::venue_not_found(id))?;

    let shows = store
        .shows_for_venue(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let artist_ids: Vec<i32> = shows.iter().map(|s| s.artist_id).collect();
    let artists: HashMap<i32, (String, Option<String>)> = store
        .get_artists_by_ids(&artist_ids)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .into_iter()
        .map(|a| (a.id, (a.name, a.image_link)))
        .collect();

    let now = Utc::now();
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for show in shows {
        let (artist_name, artist_image_link) = artists
            .get(&show.artist_id)
            .cloned()
            .unwrap_or((String::new(), None));
        let dto = ShowArtistDto {
            artist_id: show.artist_id,
            artist_name,
            artist_image_link,
            start_time: show.start_time.to_rfc3339(),
        };

        if show.is_upcoming(now) {
            upcoming_shows.push(dto);
        } else {
            past_shows.push(dto);
        }
    }

    Ok(Json(ApiResponse::success(VenueDetailDto {
        id: venue.id,
        name: venue.name,
        city: venue.city,
        state: venue.state,
        address: venue.address,
        phone: venue.phone,
        image_link: venue.image_link,
        facebook_link: venue.facebook_link,
        genres: venue.genres,
        website: venue.website,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        num_past_shows: past_shows.len(),
        num_upcoming_shows: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })))
}

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewVenue>,
) -> Result<Json<ApiResponse<Venue>>, ApiError> {
    validation::validate_required("name", &payload.name)?;
    validation::validate_required("city", &payload.city)?;
    validation::validate_required("state", &payload.state)?;

    let venue = state
        .store()
        .add_venue(&payload)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(venue)))
}

pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<VenueChanges>,
) -> Result<Json<ApiResponse<Venue>>, ApiError> {
    validation::validate_entity_id("venue", id)?;
    if let Some(name) = &payload.name {
        validation::validate_required("name", name)?;
    }

    let venue = state
        .store()
        .update_venue(id, &payload)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?
        .ok_or_else(|| ApiError::venue_not_found(id))?;

    Ok(Json(ApiResponse::success(venue)))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    validation::validate_entity_id("venue", id)?;

    let removed = state
        .store()
        .remove_venue(id)
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    if !removed {
        return Err(ApiError::venue_not_found(id));
    }

    Ok(Json(ApiResponse::success(())))
}
