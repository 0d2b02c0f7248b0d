//! The ports the search domain requires from its collaborators.

use estate_filters::ListingPredicate;
use estate_geo::GeoPoint;
use models_estate::{ListingWithOwner, SortOption};
use uuid::Uuid;

use crate::domain::models::{LikeToggle, SearcherProfile};

/// Storage of listings, queried three ways: nearest-first around a point,
/// within a radius, and with no geo constraint at all.
pub trait ListingStore: Send + Sync + 'static {
    /// the error type that can occur
    type Err: Send;

    /// nearest-first query around `origin` bounded by `max_distance_m`
    /// meters, with the total match count from the same pass
    fn geo_nearest(
        &self,
        origin: GeoPoint,
        max_distance_m: f64,
        predicate: &ListingPredicate,
        skip: i64,
        limit: i64,
    ) -> impl Future<Output = Result<(Vec<ListingWithOwner>, i64), Self::Err>> + Send;

    /// page of matches within `radius_km` of `origin`, ordered by `sort`
    fn geo_within(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        predicate: &ListingPredicate,
        sort: SortOption,
        skip: i64,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<ListingWithOwner>, Self::Err>> + Send;

    /// count of matches within `radius_km` of `origin`
    fn count_within(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        predicate: &ListingPredicate,
    ) -> impl Future<Output = Result<i64, Self::Err>> + Send;

    /// non-geo query with the total match count
    fn list(
        &self,
        predicate: &ListingPredicate,
        sort: SortOption,
        skip: i64,
        limit: i64,
    ) -> impl Future<Output = Result<(Vec<ListingWithOwner>, i64), Self::Err>> + Send;
}

/// The user directory slice search depends on.
pub trait UserDirectory: Send + Sync + 'static {
    /// the error type that can occur
    type Err: Send;

    /// the searcher's profile, `None` when the user does not exist
    fn search_profile(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<SearcherProfile>, Self::Err>> + Send;

    /// record that the user has opened the app
    fn mark_opened_app(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<(), Self::Err>> + Send;
}

/// Storage of per-listing engagement state: distinct view counting and the
/// like relation.
pub trait EngagementStore: Send + Sync + 'static {
    /// the error type that can occur
    type Err: Send;

    /// Record a view by `viewer`, counting each viewer at most once.
    /// Returns the view count after the call, `None` for an unknown id.
    fn record_view(
        &self,
        estate_id: Uuid,
        viewer: Uuid,
    ) -> impl Future<Output = Result<Option<i64>, Self::Err>> + Send;

    /// the current view count, `None` for an unknown id
    fn view_count(
        &self,
        estate_id: Uuid,
    ) -> impl Future<Output = Result<Option<i64>, Self::Err>> + Send;

    /// Flip `user_id`'s like on the listing. Returns the resulting
    /// state, `None` for an unknown id.
    fn toggle_like(
        &self,
        estate_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<LikeToggle>, Self::Err>> + Send;
}
