use crate::entities::{artists, prelude::*, shows};
use crate::models::artist::{Artist, ArtistChanges, NewArtist};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

/// Repository for artist rows and their owned shows.
pub struct ArtistRepository {
    conn: DatabaseConnection,
}

impl ArtistRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: artists::Model) -> Artist {
        Artist {
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            genres: model
                .genres
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            website: model.website,
            seeking_venue: model.seeking_venue,
            seeking_description: model.seeking_description,
            created_at: model.created_at.unwrap_or_default(),
        }
    }

    pub async fn add(&self, artist: &NewArtist) -> Result<Artist> {
        let active_model = artists::ActiveModel {
            name: Set(artist.name.clone()),
            city: Set(artist.city.clone()),
            state: Set(artist.state.clone()),
            phone: Set(artist.phone.clone()),
            image_link: Set(artist.image_link.clone()),
            facebook_link: Set(artist.facebook_link.clone()),
            genres: Set(serde_json::to_string(&artist.genres).ok()),
            website: Set(artist.website.clone()),
            seeking_venue: Set(artist.seeking_venue),
            seeking_description: Set(artist.seeking_description.clone()),
            created_at: Set(Some(Utc::now().to_rfc3339())),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!("Listed artist '{}' (ID: {})", model.name, model.id);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Artist>> {
        let result = Artists::find_by_id(id).one(&self.conn).await?;
        Ok(result.map(Self::map_model))
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<Artist>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Artists::find()
            .filter(artists::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Artist>> {
        let rows = Artists::find()
            .order_by_asc(artists::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Substring match on name, case-insensitive under SQLite's LIKE.
    pub async fn search(&self, term: &str) -> Result<Vec<Artist>> {
        let rows = Artists::find()
            .filter(artists::Column::Name.contains(term))
            .order_by_asc(artists::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Artists::find().count(&self.conn).await?;
        Ok(count)
    }

    pub async fn update(&self, id: i32, changes: &ArtistChanges) -> Result<Option<Artist>> {
        let Some(existing) = Artists::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: artists::ActiveModel = existing.into();
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(city) = &changes.city {
            active.city = Set(city.clone());
        }
        if let Some(state) = &changes.state {
            active.state = Set(state.clone());
        }
        if let Some(phone) = &changes.phone {
            active.phone = Set(Some(phone.clone()));
        }
        if let Some(image_link) = &changes.image_link {
            active.image_link = Set(Some(image_link.clone()));
        }
        if let Some(facebook_link) = &changes.facebook_link {
            active.facebook_link = Set(Some(facebook_link.clone()));
        }
        if let Some(genres) = &changes.genres {
            active.genres = Set(serde_json::to_string(genres).ok());
        }
        if let Some(website) = &changes.website {
            active.website = Set(Some(website.clone()));
        }
        if let Some(seeking_venue) = changes.seeking_venue {
            active.seeking_venue = Set(seeking_venue);
        }
        if let Some(seeking_description) = &changes.seeking_description {
            active.seeking_description = Set(seeking_description.clone());
        }

        let model = active.update(&self.conn).await?;
        info!("Updated artist {}", id);
        Ok(Some(Self::map_model(model)))
    }

    /// Deletes the artist and every show referencing it in one
    /// transaction.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        shows::Entity::delete_many()
            .filter(shows::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;

        let result = Artists::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed artist {} and its shows", id);
        }
        Ok(removed)
    }
}
