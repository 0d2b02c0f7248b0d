//! [mockall::mock] doubles for the search ports, for tests in dependent
//! crates.

use std::convert::Infallible;

use estate_filters::ListingPredicate;
use estate_geo::GeoPoint;
use mockall::mock;
use models_estate::{ListingWithOwner, SortOption};
use uuid::Uuid;

use crate::domain::models::{LikeToggle, SearcherProfile};
use crate::domain::ports::{EngagementStore, ListingStore, UserDirectory};

const _NOT_PROD: () = const {
    assert!(
        cfg!(debug_assertions),
        "You are trying to include mock code in a production build please run `cargo tree -i estate_search -e features -p <FAILING_PACKAGE>` to see how the mock feature is being included in [dependencies]"
    );
};

mock! {
    pub ListingStorePort {}
    impl ListingStore for ListingStorePort {
        type Err = Infallible;

        fn geo_nearest<'a>(
            &self,
            origin: GeoPoint,
            max_distance_m: f64,
            predicate: &'a ListingPredicate,
            skip: i64,
            limit: i64,
        ) -> impl Future<Output = Result<(Vec<ListingWithOwner>, i64), Infallible>> + Send;

        fn geo_within<'a>(
            &self,
            origin: GeoPoint,
            radius_km: f64,
            predicate: &'a ListingPredicate,
            sort: SortOption,
            skip: i64,
            limit: i64,
        ) -> impl Future<Output = Result<Vec<ListingWithOwner>, Infallible>> + Send;

        fn count_within<'a>(
            &self,
            origin: GeoPoint,
            radius_km: f64,
            predicate: &'a ListingPredicate,
        ) -> impl Future<Output = Result<i64, Infallible>> + Send;

        fn list<'a>(
            &self,
            predicate: &'a ListingPredicate,
            sort: SortOption,
            skip: i64,
            limit: i64,
        ) -> impl Future<Output = Result<(Vec<ListingWithOwner>, i64), Infallible>> + Send;
    }
}

mock! {
    pub UserDirectoryPort {}
    impl UserDirectory for UserDirectoryPort {
        type Err = Infallible;

        fn search_profile(
            &self,
            user_id: Uuid,
        ) -> impl Future<Output = Result<Option<SearcherProfile>, Infallible>> + Send;

        fn mark_opened_app(
            &self,
            user_id: Uuid,
        ) -> impl Future<Output = Result<(), Infallible>> + Send;
    }
}

mock! {
    pub EngagementStorePort {}
    impl EngagementStore for EngagementStorePort {
        type Err = Infallible;

        fn record_view(
            &self,
            estate_id: Uuid,
            viewer: Uuid,
        ) -> impl Future<Output = Result<Option<i64>, Infallible>> + Send;

        fn view_count(
            &self,
            estate_id: Uuid,
        ) -> impl Future<Output = Result<Option<i64>, Infallible>> + Send;

        fn toggle_like(
            &self,
            estate_id: Uuid,
            user_id: Uuid,
        ) -> impl Future<Output = Result<Option<LikeToggle>, Infallible>> + Send;
    }
}
