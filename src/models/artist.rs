use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewArtist {
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
}

/// Partial update: only fields that are present are overwritten.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Option<Vec<String>>,
    pub website: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}
