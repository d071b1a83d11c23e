use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: i32,
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: DateTime<Utc>,
    pub created_at: String,
}

impl Show {
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewShow {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: DateTime<Utc>,
}
