use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub created_at: String,
}

/// Payload for listing a new venue. Required fields are enforced by the
/// API layer, not serde, so that missing data surfaces as a 400 rather
/// than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewVenue {
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
}

/// Partial update: only fields that are present are overwritten.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub website: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}
