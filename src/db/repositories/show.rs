use crate::entities::{prelude::*, shows};
use crate::models::show::{NewShow, Show};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use tracing::info;

/// Repository for show rows.
pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: shows::Model) -> Show {
        Show {
            id: model.id,
            artist_id: model.artist_id,
            venue_id: model.venue_id,
            start_time: model.start_time,
            created_at: model.created_at.unwrap_or_default(),
        }
    }

    pub async fn add(&self, show: &NewShow) -> Result<Show> {
        let active_model = shows::ActiveModel {
            artist_id: Set(show.artist_id),
            venue_id: Set(show.venue_id),
            start_time: Set(show.start_time),
            created_at: Set(Some(Utc::now().to_rfc3339())),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!(
            "Listed show {} (artist {} at venue {})",
            model.id, model.artist_id, model.venue_id
        );
        Ok(Self::map_model(model))
    }

    pub async fn list_all(&self) -> Result<Vec<Show>> {
        let rows = Shows::find()
            .order_by_asc(shows::Column::StartTime)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn for_venue(&self, venue_id: i32) -> Result<Vec<Show>> {
        let rows = Shows::find()
            .filter(shows::Column::VenueId.eq(venue_id))
            .order_by_asc(shows::Column::StartTime)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn for_artist(&self, artist_id: i32) -> Result<Vec<Show>> {
        let rows = Shows::find()
            .filter(shows::Column::ArtistId.eq(artist_id))
            .order_by_asc(shows::Column::StartTime)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Shows::find().count(&self.conn).await?;
        Ok(count)
    }

    /// Upcoming-show counts for every venue in one grouped query, so the
    /// grouped listing does not issue a count per row.
    pub async fn upcoming_counts_by_venue(&self, now: DateTime<Utc>) -> Result<HashMap<i32, i64>> {
        let rows: Vec<(i32, i64)> = Shows::find()
            .select_only()
            .column(shows::Column::VenueId)
            .column_as(shows::Column::Id.count(), "count")
            .filter(shows::Column::StartTime.gt(now))
            .group_by(shows::Column::VenueId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn upcoming_counts_by_artist(&self, now: DateTime<Utc>) -> Result<HashMap<i32, i64>> {
        let rows: Vec<(i32, i64)> = Shows::find()
            .select_only()
            .column(shows::Column::ArtistId)
            .column_as(shows::Column::Id.count(), "count")
            .filter(shows::Column::StartTime.gt(now))
            .group_by(shows::Column::ArtistId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
