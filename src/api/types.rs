use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One row of a directory listing or search result.
#[derive(Debug, Serialize)]
pub struct DirectoryEntryDto {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing a (city, state) location.
#[derive(Debug, Serialize)]
pub struct VenueAreaDto {
    pub city: String,
    pub state: String,
    pub venues: Vec<DirectoryEntryDto>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultsDto {
    pub count: usize,
    pub data: Vec<DirectoryEntryDto>,
}

/// Form body of the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

/// A show as seen from a venue page: the artist on the bill.
#[derive(Debug, Serialize)]
pub struct ShowArtistDto {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// A show as seen from an artist page: the venue hosting it.
#[derive(Debug, Serialize)]
pub struct ShowVenueDto {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Serialize)]
pub struct VenueDetailDto {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub past_shows: Vec<ShowArtistDto>,
    pub upcoming_shows: Vec<ShowArtistDto>,
    pub num_past_shows: usize,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailDto {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub past_shows: Vec<ShowVenueDto>,
    pub upcoming_shows: Vec<ShowVenueDto>,
    pub num_past_shows: usize,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub venues: u64,
    pub artists: u64,
    pub shows: u64,
}

/// A show with the display fields of both sides denormalized in.
#[derive(Debug, Serialize)]
pub struct ShowDto {
    pub id: i32,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}
