use crate::models::artist::{Artist, ArtistChanges, NewArtist};
use crate::models::show::{NewShow, Show};
use crate::models::venue::{NewVenue, Venue, VenueChanges};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn venue_repo(&self) -> repositories::venue::VenueRepository {
        repositories::venue::VenueRepository::new(self.conn.clone())
    }

    fn artist_repo(&self) -> repositories::artist::ArtistRepository {
        repositories::artist::ArtistRepository::new(self.conn.clone())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    pub async fn add_venue(&self, venue: &NewVenue) -> Result<Venue> {
        self.venue_repo().add(venue).await
    }

    pub async fn get_venue(&self, id: i32) -> Result<Option<Venue>> {
        self.venue_repo().get(id).await
    }

    pub async fn get_venues_by_ids(&self, ids: &[i32]) -> Result<Vec<Venue>> {
        self.venue_repo().get_by_ids(ids).await
    }

    pub async fn list_venues(&self) -> Result<Vec<Venue>> {
        self.venue_repo().list_all().await
    }

    pub async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        self.venue_repo().search(term).await
    }

    pub async fn update_venue(&self, id: i32, changes: &VenueChanges) -> Result<Option<Venue>> {
        self.venue_repo().update(id, changes).await
    }

    pub async fn remove_venue(&self, id: i32) -> Result<bool> {
        self.venue_repo().remove(id).await
    }

    pub async fn add_artist(&self, artist: &NewArtist) -> Result<Artist> {
        self.artist_repo().add(artist).await
    }

    pub async fn get_artist(&self, id: i32) -> Result<Option<Artist>> {
        self.artist_repo().get(id).await
    }

    pub async fn get_artists_by_ids(&self, ids: &[i32]) -> Result<Vec<Artist>> {
        self.artist_repo().get_by_ids(ids).await
    }

    pub async fn list_artists(&self) -> Result<Vec<Artist>> {
        self.artist_repo().list_all().await
    }

    pub async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        self.artist_repo().search(term).await
    }

    pub async fn update_artist(&self, id: i32, changes: &ArtistChanges) -> Result<Option<Artist>> {
        self.artist_repo().update(id, changes).await
    }

    pub async fn remove_artist(&self, id: i32) -> Result<bool> {
        self.artist_repo().remove(id).await
    }

    pub async fn add_show(&self, show: &NewShow) -> Result<Show> {
        self.show_repo().add(show).await
    }

    pub async fn list_shows(&self) -> Result<Vec<Show>> {
        self.show_repo().list_all().await
    }

    pub async fn shows_for_venue(&self, venue_id: i32) -> Result<Vec<Show>> {
        self.show_repo().for_venue(venue_id).await
    }

    pub async fn shows_for_artist(&self, artist_id: i32) -> Result<Vec<Show>> {
        self.show_repo().for_artist(artist_id).await
    }

    pub async fn upcoming_show_counts_by_venue(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<i32, i64>> {
        self.show_repo().upcoming_counts_by_venue(now).await
    }

    pub async fn upcoming_show_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> Result<HashMap<i32, i64>> {
        self.show_repo().upcoming_counts_by_artist(now).await
    }

    pub async fn count_venues(&self) -> Result<u64> {
        self.venue_repo().count().await
    }

    pub async fn count_artists(&self) -> Result<u64> {
        self.artist_repo().count().await
    }

    pub async fn count_shows(&self) -> Result<u64> {
        self.show_repo().count().await
    }
}
