//! Postgres adapters for the search ports, delegating to the shared query
//! modules in `estate_db_client`.

use estate_filters::ListingPredicate;
use estate_geo::GeoPoint;
use models_estate::{ListingWithOwner, SortOption};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{LikeToggle, SearcherProfile};
use crate::domain::ports::{EngagementStore, ListingStore, UserDirectory};

/// [ListingStore] against a postgres pool.
#[derive(Debug, Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    /// create a new instance over the given pool
    pub fn new(pool: PgPool) -> Self {
        PgListingStore { pool }
    }
}

impl ListingStore for PgListingStore {
    type Err = anyhow::Error;

    async fn geo_nearest(
        &self,
        origin: GeoPoint,
        max_distance_m: f64,
        predicate: &ListingPredicate,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ListingWithOwner>, i64), Self::Err> {
        estate_db_client::estate::geo_nearest::geo_nearest(
            &self.pool,
            origin,
            max_distance_m,
            predicate,
            skip,
            limit,
        )
        .await
    }

    async fn geo_within(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        predicate: &ListingPredicate,
        sort: SortOption,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ListingWithOwner>, Self::Err> {
        estate_db_client::estate::geo_within::geo_within(
            &self.pool, origin, radius_km, predicate, sort, skip, limit,
        )
        .await
    }

    async fn count_within(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        predicate: &ListingPredicate,
    ) -> Result<i64, Self::Err> {
        estate_db_client::estate::geo_within::count_within_radius(
            &self.pool, origin, radius_km, predicate,
        )
        .await
    }

    async fn list(
        &self,
        predicate: &ListingPredicate,
        sort: SortOption,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ListingWithOwner>, i64), Self::Err> {
        estate_db_client::estate::list::list_estates(&self.pool, predicate, sort, skip, limit)
            .await
    }
}

/// [UserDirectory] against a postgres pool.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// create a new instance over the given pool
    pub fn new(pool: PgPool) -> Self {
        PgUserDirectory { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    type Err = anyhow::Error;

    async fn search_profile(&self, user_id: Uuid) -> Result<Option<SearcherProfile>, Self::Err> {
        let profile =
            estate_db_client::user::get_search_profile::get_search_profile(&self.pool, user_id)
                .await?;
        Ok(profile.map(|p| SearcherProfile {
            has_opened_app: p.has_opened_app,
            current_location: p.current_location,
            home_location: p.home_location,
        }))
    }

    async fn mark_opened_app(&self, user_id: Uuid) -> Result<(), Self::Err> {
        estate_db_client::user::mark_opened_app::mark_opened_app(&self.pool, user_id).await
    }
}

/// [EngagementStore] against a postgres pool.
#[derive(Debug, Clone)]
pub struct PgEngagementStore {
    pool: PgPool,
}

impl PgEngagementStore {
    /// create a new instance over the given pool
    pub fn new(pool: PgPool) -> Self {
        PgEngagementStore { pool }
    }
}

impl EngagementStore for PgEngagementStore {
    type Err = anyhow::Error;

    async fn record_view(&self, estate_id: Uuid, viewer: Uuid) -> Result<Option<i64>, Self::Err> {
        estate_db_client::estate::increment_view::increment_view(&self.pool, estate_id, viewer)
            .await
    }

    async fn view_count(&self, estate_id: Uuid) -> Result<Option<i64>, Self::Err> {
        estate_db_client::estate::increment_view::get_views_count(&self.pool, estate_id).await
    }

    async fn toggle_like(
        &self,
        estate_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<LikeToggle>, Self::Err> {
        let outcome =
            estate_db_client::estate::toggle_like::toggle_like(&self.pool, estate_id, user_id)
                .await?;
        Ok(outcome.map(|o| LikeToggle {
            liked: o.liked,
            like_count: o.like_count,
        }))
    }
}
