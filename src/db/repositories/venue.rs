use crate::entities::{prelude::*, shows, venues};
use crate::models::venue::{NewVenue, Venue, VenueChanges};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

/// Repository for venue rows and their owned shows.
pub struct VenueRepository {
    conn: DatabaseConnection,
}

impl VenueRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: venues::Model) -> Venue {
        Venue {
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            address: model.address,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            genres: model
                .genres
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            website: model.website,
            seeking_talent: model.seeking_talent,
            seeking_description: model.seeking_description,
            created_at: model.created_at.unwrap_or_default(),
        }
    }

    pub async fn add(&self, venue: &NewVenue) -> Result<Venue> {
        let active_model = venues::ActiveModel {
            name: Set(venue.name.clone()),
            city: Set(venue.city.clone()),
            state: Set(venue.state.clone()),
            address: Set(venue.address.clone()),
            phone: Set(venue.phone.clone()),
            image_link: Set(venue.image_link.clone()),
            facebook_link: Set(venue.facebook_link.clone()),
            genres: Set(serde_json::to_string(&venue.genres).ok()),
            website: Set(venue.website.clone()),
            seeking_talent: Set(venue.seeking_talent),
            seeking_description: Set(venue.seeking_description.clone()),
            created_at: Set(Some(Utc::now().to_rfc3339())),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!("Listed venue '{}' (ID: {})", model.name, model.id);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Venue>> {
        let result = Venues::find_by_id(id).one(&self.conn).await?;
        Ok(result.map(Self::map_model))
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<Venue>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Venues::find()
            .filter(venues::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// All venues, ordered so that consecutive rows share a (city, state)
    /// group. The grouped listing relies on this ordering.
    pub async fn list_all(&self) -> Result<Vec<Venue>> {
        let rows = Venues::find()
            .order_by_asc(venues::Column::City)
            .order_by_asc(venues::Column::State)
            .order_by_asc(venues::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Substring match on name. SQLite's LIKE is case-insensitive for
    /// ASCII, which is what the search contract asks for.
    pub async fn search(&self, term: &str) -> Result<Vec<Venue>> {
        let rows = Venues::find()
            .filter(venues::Column::Name.contains(term))
            .order_by_asc(venues::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Venues::find().count(&self.conn).await?;
        Ok(count)
    }

    pub async fn update(&self, id: i32, changes: &VenueChanges) -> Result<Option<Venue>> {
        let Some(existing) = Venues::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: venues::ActiveModel = existing.into();
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(city) = &changes.city {
            active.city = Set(city.clone());
        }
        if let Some(state) = &changes.state {
            active.state = Set(state.clone());
        }
        if let Some(address) = &changes.address {
            active.address = Set(address.clone());
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
        if let Some(seeking_talent) = changes.seeking_talent {
            active.seeking_talent = Set(seeking_talent);
        }
        if let Some(seeking_description) = &changes.seeking_description {
            active.seeking_description = Set(seeking_description.clone());
        }

        let model = active.update(&self.conn).await?;
        info!("Updated venue {}", id);
        Ok(Some(Self::map_model(model)))
    }

    /// Deletes the venue and every show referencing it in one
    /// transaction, so a failure cannot leave orphaned shows behind.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        shows::Entity::delete_many()
            .filter(shows::Column::VenueId.eq(id))
            .exec(&txn)
            .await?;

        let result = Venues::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed venue {} and its shows", id);
        }
        Ok(removed)
    }
}
