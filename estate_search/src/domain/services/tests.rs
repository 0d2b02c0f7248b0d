use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use chrono::{Duration, Utc};
use estate_filters::{ListingFilters, ListingPredicate};
use estate_geo::{GeoPoint, haversine_km};
use models_estate::{
    Category, ContactDetails, Listing, ListingWithOwner, OwnerProfile, Pricing, SortOption,
    UserStatus,
};
use uuid::Uuid;

use super::*;
use crate::domain::models::{FetchMode, NearbyQuery, PageParams, SearcherProfile};
use crate::domain::ports::{EngagementStore, ListingStore, UserDirectory};

#[derive(Clone, Default)]
struct MemStore {
    listings: Arc<Mutex<Vec<ListingWithOwner>>>,
    geo_calls: Arc<AtomicUsize>,
    count_calls: Arc<AtomicUsize>,
    fail_geo: bool,
}

impl MemStore {
    fn with(listings: Vec<ListingWithOwner>) -> Self {
        MemStore {
            listings: Arc::new(Mutex::new(listings)),
            ..Default::default()
        }
    }

    fn matching(&self, predicate: &ListingPredicate) -> Vec<ListingWithOwner> {
        self.listings
            .lock()
            .unwrap()
            .iter()
            .filter(|ad| predicate.matches(&ad.listing))
            .cloned()
            .collect()
    }
}

fn sort_ads(ads: &mut [ListingWithOwner], sort: SortOption) {
    match sort {
        SortOption::Newest => {
            ads.sort_by(|a, b| b.listing.created_at.cmp(&a.listing.created_at))
        }
        SortOption::Oldest => {
            ads.sort_by(|a, b| a.listing.created_at.cmp(&b.listing.created_at))
        }
        SortOption::TitleAsc => ads.sort_by(|a, b| a.listing.title.cmp(&b.listing.title)),
        SortOption::TitleDesc => ads.sort_by(|a, b| b.listing.title.cmp(&a.listing.title)),
    }
}

fn paginate(ads: Vec<ListingWithOwner>, skip: i64, limit: i64) -> Vec<ListingWithOwner> {
    ads.into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect()
}

impl ListingStore for MemStore {
    type Err = anyhow::Error;

    async fn geo_nearest(
        &self,
        origin: GeoPoint,
        max_distance_m: f64,
        predicate: &ListingPredicate,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ListingWithOwner>, i64), Self::Err> {
        self.geo_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_geo {
            return Err(anyhow!("geo backend down"));
        }
        let mut ads: Vec<_> = self
            .matching(predicate)
            .into_iter()
            .filter(|ad| haversine_km(origin, ad.listing.location) * 1000.0 <= max_distance_m)
            .collect();
        ads.sort_by(|a, b| {
            let da = haversine_km(origin, a.listing.location);
            let db = haversine_km(origin, b.listing.location);
            da.total_cmp(&db)
        });
        let total = ads.len() as i64;
        Ok((paginate(ads, skip, limit), total))
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
        let mut ads: Vec<_> = self
            .matching(predicate)
            .into_iter()
            .filter(|ad| haversine_km(origin, ad.listing.location) <= radius_km)
            .collect();
        sort_ads(&mut ads, sort);
        Ok(paginate(ads, skip, limit))
    }

    async fn count_within(
        &self,
        origin: GeoPoint,
        radius_km: f64,
        predicate: &ListingPredicate,
    ) -> Result<i64, Self::Err> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let n = self
            .matching(predicate)
            .into_iter()
            .filter(|ad| haversine_km(origin, ad.listing.location) <= radius_km)
            .count();
        Ok(n as i64)
    }

    async fn list(
        &self,
        predicate: &ListingPredicate,
        sort: SortOption,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ListingWithOwner>, i64), Self::Err> {
        let mut ads = self.matching(predicate);
        sort_ads(&mut ads, sort);
        let total = ads.len() as i64;
        Ok((paginate(ads, skip, limit), total))
    }
}

#[derive(Clone, Default)]
struct MemUsers {
    profiles: Arc<Mutex<HashMap<Uuid, SearcherProfile>>>,
}

impl MemUsers {
    fn with(user_id: Uuid, profile: SearcherProfile) -> Self {
        let users = MemUsers::default();
        users.profiles.lock().unwrap().insert(user_id, profile);
        users
    }

    fn profile(&self, user_id: Uuid) -> Option<SearcherProfile> {
        self.profiles.lock().unwrap().get(&user_id).copied()
    }
}

impl UserDirectory for MemUsers {
    type Err = anyhow::Error;

    async fn search_profile(&self, user_id: Uuid) -> Result<Option<SearcherProfile>, Self::Err> {
        Ok(self.profile(user_id))
    }

    async fn mark_opened_app(&self, user_id: Uuid) -> Result<(), Self::Err> {
        if let Some(profile) = self.profiles.lock().unwrap().get_mut(&user_id) {
            profile.has_opened_app = true;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Engagement {
    views_count: i64,
    viewed_by: Vec<Uuid>,
    like_count: i64,
    liked_by: Vec<Uuid>,
}

#[derive(Clone, Default)]
struct MemEngagement {
    rows: Arc<Mutex<HashMap<Uuid, Engagement>>>,
}

impl MemEngagement {
    fn with(estate_id: Uuid) -> Self {
        let store = MemEngagement::default();
        store
            .rows
            .lock()
            .unwrap()
            .insert(estate_id, Engagement::default());
        store
    }

    fn liked_by(&self, estate_id: Uuid) -> Vec<Uuid> {
        self.rows.lock().unwrap()[&estate_id].liked_by.clone()
    }
}

impl EngagementStore for MemEngagement {
    type Err = anyhow::Error;

    async fn record_view(&self, estate_id: Uuid, viewer: Uuid) -> Result<Option<i64>, Self::Err> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&estate_id) else {
            return Ok(None);
        };
        if !row.viewed_by.contains(&viewer) {
            row.viewed_by.push(viewer);
            row.views_count += 1;
        }
        Ok(Some(row.views_count))
    }

    async fn view_count(&self, estate_id: Uuid) -> Result<Option<i64>, Self::Err> {
        Ok(self.rows.lock().unwrap().get(&estate_id).map(|r| r.views_count))
    }

    async fn toggle_like(
        &self,
        estate_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<LikeToggle>, Self::Err> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&estate_id) else {
            return Ok(None);
        };
        if let Some(pos) = row.liked_by.iter().position(|id| *id == user_id) {
            row.liked_by.remove(pos);
            row.like_count -= 1;
        } else {
            row.liked_by.push(user_id);
            row.like_count += 1;
        }
        Ok(Some(LikeToggle {
            liked: row.liked_by.contains(&user_id),
            like_count: row.like_count,
        }))
    }
}

fn ad_at(title: &str, location: GeoPoint, pricing: Pricing, age_days: i64) -> ListingWithOwner {
    let created_at = Utc::now() - Duration::days(age_days);
    ListingWithOwner {
        listing: Listing {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.into(),
            description: "A reasonable description".into(),
            category: Category::Apartment,
            pricing,
            available_from: None,
            is_furnished: None,
            bedrooms: 2,
            bathrooms: 1,
            location,
            photo: vec![],
            contact_details: ContactDetails {
                phone_number: "123".into(),
                email: "owner@example.com".into(),
                address: "1 Main St".into(),
            },
            taken: false,
            featured: false,
            average_rating: 0.0,
            num_of_reviews: 0,
            views_count: 0,
            viewed_by: vec![],
            like_count: 0,
            liked_by: vec![],
            created_at,
            updated_at: created_at,
        },
        user: OwnerProfile {
            id: Uuid::new_v4(),
            username: "owner".into(),
            avatar: None,
            email: "owner@example.com".into(),
            status: UserStatus::Offline,
            last_seen: None,
        },
    }
}

fn sale_ad(title: &str, location: GeoPoint, price: f64) -> ListingWithOwner {
    ad_at(title, location, Pricing::Sale { price }, 1)
}

fn returning_user_at(location: GeoPoint) -> SearcherProfile {
    SearcherProfile {
        has_opened_app: true,
        current_location: Some(location),
        home_location: None,
    }
}

fn engine(
    store: &MemStore,
    users: &MemUsers,
) -> SearchEngineImpl<MemStore, MemUsers> {
    SearchEngineImpl::new(store.clone(), users.clone())
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let store = MemStore::default();
    let users = MemUsers::default();
    let result = engine(&store, &users)
        .nearby_page(Uuid::new_v4(), NearbyQuery::default())
        .await;
    assert!(matches!(result, Err(SearchError::UserNotFound)));
}

#[tokio::test]
async fn nearby_listing_is_served_with_nearby_flags() {
    // a listing at the origin, the requester ~5.5 km north
    let store = MemStore::with(vec![sale_ad(
        "Origin flat",
        GeoPoint::new(0.0, 0.0),
        100_000.0,
    )]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.05)));

    let page = engine(&store, &users)
        .nearby_page(user_id, NearbyQuery::default())
        .await
        .unwrap();

    assert!(page.is_nearby_data);
    assert_eq!(page.total, 1);
    assert_eq!(page.num_of_pages, 1);
    assert!(!page.has_more_nearby);
    assert_eq!(page.ads.len(), 1);
    assert_eq!(page.ads[0].listing.title, "Origin flat");
}

#[tokio::test]
async fn distant_requester_falls_back_globally() {
    // requester ~555 km away, outside the 10 km default radius
    let store = MemStore::with(vec![sale_ad(
        "Origin flat",
        GeoPoint::new(0.0, 0.0),
        100_000.0,
    )]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 5.0)));

    let page = engine(&store, &users)
        .nearby_page(user_id, NearbyQuery::default())
        .await
        .unwrap();

    assert!(!page.is_nearby_data);
    assert!(!page.has_more_nearby);
    assert_eq!(page.ads.len(), 1);
}

#[tokio::test]
async fn fetch_mode_all_never_goes_geo() {
    let store = MemStore::with(vec![sale_ad(
        "Origin flat",
        GeoPoint::new(0.0, 0.0),
        100_000.0,
    )]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let query = NearbyQuery {
        fetch_mode: FetchMode::All,
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();

    assert!(!page.is_nearby_data);
    assert!(!page.has_more_nearby);
    assert_eq!(store.geo_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_location_skips_geo() {
    let store = MemStore::with(vec![sale_ad(
        "Origin flat",
        GeoPoint::new(0.0, 0.0),
        100_000.0,
    )]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(
        user_id,
        SearcherProfile {
            has_opened_app: true,
            current_location: None,
            home_location: None,
        },
    );

    let page = engine(&store, &users)
        .nearby_page(user_id, NearbyQuery::default())
        .await
        .unwrap();

    assert!(!page.is_nearby_data);
    assert_eq!(page.ads.len(), 1);
    assert_eq!(store.geo_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_override_uses_stored_location() {
    let store = MemStore::with(vec![sale_ad(
        "Origin flat",
        GeoPoint::new(0.0, 0.0),
        100_000.0,
    )]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.05)));

    let query = NearbyQuery {
        location_override: Some(GeoPoint::new(500.0, 100.0)),
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();

    // bad override discarded, stored location still finds the listing
    assert!(page.is_nearby_data);
}

#[tokio::test]
async fn geo_failure_is_absorbed_into_fallback() {
    let mut store = MemStore::with(vec![sale_ad(
        "Origin flat",
        GeoPoint::new(0.0, 0.0),
        100_000.0,
    )]);
    store.fail_geo = true;
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let page = engine(&store, &users)
        .nearby_page(user_id, NearbyQuery::default())
        .await
        .unwrap();

    assert!(!page.is_nearby_data);
    assert_eq!(page.ads.len(), 1);
    assert_eq!(store.geo_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn first_time_user_gets_unfiltered_feed_once() {
    let mut taken = sale_ad("Taken flat", GeoPoint::new(0.0, 0.0), 50_000.0);
    taken.listing.taken = true;
    let store = MemStore::with(vec![
        sale_ad("Cheap flat", GeoPoint::new(0.0, 0.0), 50_000.0),
        sale_ad("Pricey flat", GeoPoint::new(0.0, 0.0), 900_000.0),
        taken,
    ]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(
        user_id,
        SearcherProfile {
            has_opened_app: false,
            current_location: Some(GeoPoint::new(0.0, 0.0)),
            home_location: None,
        },
    );

    // filters that would exclude the pricey flat are ignored on first open
    let query = NearbyQuery {
        filters: ListingFilters {
            max_price: Some(100_000.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();

    assert!(!page.is_nearby_data);
    assert_eq!(page.total, 2, "all non-taken listings, filters ignored");
    assert!(users.profile(user_id).unwrap().has_opened_app);

    // the second call behaves like a normal filtered search
    let query = NearbyQuery {
        filters: ListingFilters {
            max_price: Some(100_000.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();
    assert!(page.is_nearby_data);
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn price_window_filters_nearby_results() {
    let store = MemStore::with(vec![
        sale_ad("In window", GeoPoint::new(0.0, 0.0), 150_000.0),
        sale_ad("Too cheap", GeoPoint::new(0.0, 0.0), 50_000.0),
        sale_ad("Too dear", GeoPoint::new(0.0, 0.0), 500_000.0),
    ]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let query = NearbyQuery {
        filters: ListingFilters {
            min_price: Some(100_000.0),
            max_price: Some(200_000.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();

    assert!(page.is_nearby_data);
    assert_eq!(page.total, 1);
    assert_eq!(page.ads[0].listing.title, "In window");
}

#[tokio::test]
async fn nearby_pagination_reports_more_pages() {
    let ads: Vec<_> = (0..25)
        .map(|i| sale_ad(&format!("Flat {i}"), GeoPoint::new(0.0, 0.0), 100_000.0))
        .collect();
    let store = MemStore::with(ads);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let query = NearbyQuery {
        page: PageParams { page: 1, limit: 20 },
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.num_of_pages, 2);
    assert_eq!(page.ads.len(), 20);
    assert!(page.has_more_nearby);

    let query = NearbyQuery {
        page: PageParams { page: 2, limit: 20 },
        ..Default::default()
    };
    let page = engine(&store, &users)
        .nearby_page(user_id, query)
        .await
        .unwrap();
    assert_eq!(page.ads.len(), 5);
    assert!(!page.has_more_nearby);
}

#[tokio::test]
async fn browse_expands_radius_until_found() {
    // ~555 km away: outside the 200 km initial radius, inside the first
    // expansion
    let store = MemStore::with(vec![sale_ad(
        "Far flat",
        GeoPoint::new(0.0, 5.0),
        100_000.0,
    )]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let page = engine(&store, &users)
        .browse_page(user_id, BrowseQuery::default())
        .await
        .unwrap();

    assert_eq!(page.total_ads, 1);
    assert_eq!(page.ads[0].listing.title, "Far flat");
    assert_eq!(store.count_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn browse_expansion_terminates_on_empty_store() {
    let store = MemStore::default();
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let page = engine(&store, &users)
        .browse_page(user_id, BrowseQuery::default())
        .await
        .unwrap();

    assert!(page.ads.is_empty());
    assert_eq!(page.total_ads, 0);
    assert_eq!(page.num_of_pages, 0);
    // bounded: ceil((max - initial) / increment) + 1 attempts
    let bound = ((MAX_RADIUS_KM - INITIAL_RADIUS_KM) / RADIUS_INCREMENT_KM).ceil() as usize + 1;
    assert!(store.count_calls.load(Ordering::SeqCst) <= bound);
}

#[tokio::test]
async fn browse_with_search_term_skips_geo() {
    let store = MemStore::with(vec![
        sale_ad("Beach villa", GeoPoint::new(100.0, 45.0), 100_000.0),
        sale_ad("City flat", GeoPoint::new(0.0, 0.0), 100_000.0),
    ]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let query = BrowseQuery {
        filters: ListingFilters {
            title_search: Some("villa".into()),
            ..Default::default()
        },
        ..Default::default()
    };
    let page = engine(&store, &users)
        .browse_page(user_id, query)
        .await
        .unwrap();

    assert_eq!(page.total_ads, 1);
    assert_eq!(page.ads[0].listing.title, "Beach villa");
    assert_eq!(store.count_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn browse_sorts_titles() {
    let store = MemStore::with(vec![
        sale_ad("Zeta flat", GeoPoint::new(0.0, 0.0), 100_000.0),
        sale_ad("Alpha flat", GeoPoint::new(0.0, 0.0), 100_000.0),
    ]);
    let user_id = Uuid::new_v4();
    let users = MemUsers::with(user_id, returning_user_at(GeoPoint::new(0.0, 0.0)));

    let query = BrowseQuery {
        sort: SortOption::TitleAsc,
        ..Default::default()
    };
    let page = engine(&store, &users)
        .browse_page(user_id, query)
        .await
        .unwrap();
    assert_eq!(page.ads[0].listing.title, "Alpha flat");
    assert_eq!(page.ads[1].listing.title, "Zeta flat");
}

#[tokio::test]
async fn repeat_views_by_one_viewer_count_once() {
    let estate_id = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    let service = EngagementServiceImpl::new(MemEngagement::with(estate_id));

    for _ in 0..5 {
        let count = service.view(estate_id, Some(viewer)).await.unwrap();
        assert_eq!(count, Some(1));
    }

    let other = Uuid::new_v4();
    let count = service.view(estate_id, Some(other)).await.unwrap();
    assert_eq!(count, Some(2));
}

#[tokio::test]
async fn anonymous_view_reads_without_counting() {
    let estate_id = Uuid::new_v4();
    let service = EngagementServiceImpl::new(MemEngagement::with(estate_id));

    assert_eq!(service.view(estate_id, None).await.unwrap(), Some(0));

    service
        .view(estate_id, Some(Uuid::new_v4()))
        .await
        .unwrap();
    assert_eq!(service.view(estate_id, None).await.unwrap(), Some(1));
}

#[tokio::test]
async fn engagement_on_unknown_listing_is_none() {
    let service = EngagementServiceImpl::new(MemEngagement::default());
    let estate_id = Uuid::new_v4();
    let user = Uuid::new_v4();

    assert_eq!(service.view(estate_id, Some(user)).await.unwrap(), None);
    assert_eq!(service.view(estate_id, None).await.unwrap(), None);
    assert_eq!(service.toggle_like(estate_id, user).await.unwrap(), None);
}

#[tokio::test]
async fn like_toggle_is_its_own_inverse() {
    let estate_id = Uuid::new_v4();
    let user = Uuid::new_v4();
    let store = MemEngagement::with(estate_id);
    let service = EngagementServiceImpl::new(store.clone());

    let first = service.toggle_like(estate_id, user).await.unwrap().unwrap();
    assert!(first.liked);
    assert_eq!(first.like_count, 1);
    assert_eq!(store.liked_by(estate_id), vec![user]);

    let second = service.toggle_like(estate_id, user).await.unwrap().unwrap();
    assert!(!second.liked);
    assert_eq!(second.like_count, 0);
    assert!(store.liked_by(estate_id).is_empty());
}

#[tokio::test]
async fn like_count_tracks_liker_set_size() {
    let estate_id = Uuid::new_v4();
    let store = MemEngagement::with(estate_id);
    let service = EngagementServiceImpl::new(store.clone());

    let likers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    for user in &likers {
        let state = service.toggle_like(estate_id, *user).await.unwrap().unwrap();
        assert_eq!(state.like_count, store.liked_by(estate_id).len() as i64);
    }
    assert_eq!(store.liked_by(estate_id).len(), 3);

    let state = service
        .toggle_like(estate_id, likers[1])
        .await
        .unwrap()
        .unwrap();
    assert!(!state.liked);
    assert_eq!(state.like_count, 2);
    assert_eq!(state.like_count, store.liked_by(estate_id).len() as i64);
}
