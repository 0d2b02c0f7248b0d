//! Request and response models for the search domain.

use estate_filters::ListingFilters;
use estate_geo::GeoPoint;
use models_estate::{ListingWithOwner, SortOption};

/// Default search radius in kilometers for the nearby path.
pub const DEFAULT_DISTANCE_KM: f64 = 10.0;
/// Default page number.
pub const DEFAULT_PAGE: i64 = 1;
/// Default page size.
pub const DEFAULT_LIMIT: i64 = 20;
/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 100;
/// Starting radius in kilometers for the expanding-radius path.
pub const INITIAL_RADIUS_KM: f64 = 200.0;
/// Radius growth per expansion attempt, in kilometers.
pub const RADIUS_INCREMENT_KM: f64 = 1000.0;
/// Ceiling on the expanding radius, in kilometers.
pub const MAX_RADIUS_KM: f64 = 500_000.0;

/// Whether a search wants nearby listings or the whole catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// geo search around the effective location, with fallback
    #[default]
    Nearby,
    /// skip geo entirely, global listing
    All,
}

impl FetchMode {
    /// parse the query-string value; anything other than `all` means nearby
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("all") => FetchMode::All,
            _ => FetchMode::Nearby,
        }
    }
}

/// Normalized pagination: page is 1-based, limit clamped to [1, MAX_LIMIT].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: i64,
    /// page size
    pub limit: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// normalize raw query-string values, clamping out-of-range input
    /// rather than rejecting it
    pub fn from_request(page: Option<i64>, limit: Option<i64>) -> Self {
        PageParams {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// how many records to skip for this page
    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// ceil(total / limit)
    pub fn num_of_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }

    /// whether pages beyond this one exist for `total` matches
    pub fn has_more(&self, total: i64) -> bool {
        self.page < self.num_of_pages(total)
    }
}

/// The slice of a user record that steers search behavior.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearcherProfile {
    /// false until the app has been opened once; first-time users get the
    /// global feed regardless of filters
    pub has_opened_app: bool,
    /// last reported live location
    pub current_location: Option<GeoPoint>,
    /// stored home location
    pub home_location: Option<GeoPoint>,
}

impl SearcherProfile {
    /// Resolve the location a search should center on. An explicit
    /// override wins when it validates; invalid overrides are discarded
    /// silently in favor of the stored locations.
    pub fn effective_location(&self, explicit: Option<GeoPoint>) -> Option<GeoPoint> {
        explicit
            .filter(GeoPoint::is_valid)
            .or_else(|| estate_geo::resolve_effective_location(self.current_location, self.home_location))
    }
}

/// A nearby-style search invocation.
#[derive(Debug, Clone, Default)]
pub struct NearbyQuery {
    /// explicit coordinate override from the request, unvalidated
    pub location_override: Option<GeoPoint>,
    /// search radius in kilometers; `None` means [DEFAULT_DISTANCE_KM]
    pub distance_km: Option<f64>,
    /// nearby vs global
    pub fetch_mode: FetchMode,
    /// pagination
    pub page: PageParams,
    /// the caller's filter bundle
    pub filters: ListingFilters,
}

impl NearbyQuery {
    /// the search radius to use, in kilometers
    pub fn distance_km(&self) -> f64 {
        match self.distance_km {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => DEFAULT_DISTANCE_KM,
        }
    }
}

/// A browse invocation on the legacy expanding-radius path.
#[derive(Debug, Clone, Default)]
pub struct BrowseQuery {
    /// sort for the non-distance-ordered result
    pub sort: SortOption,
    /// pagination
    pub page: PageParams,
    /// the caller's filter bundle; a title search or category here routes
    /// to the plain listing path instead of radius expansion
    pub filters: ListingFilters,
}

/// A page of search results with its nearby-origin flags.
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// the listings on this page
    pub ads: Vec<ListingWithOwner>,
    /// total matches across all pages
    pub total: i64,
    /// ceil(total / limit)
    pub num_of_pages: i64,
    /// the echoed page number
    pub page: i64,
    /// whether this page came from the geo query
    pub is_nearby_data: bool,
    /// whether more nearby pages exist
    pub has_more_nearby: bool,
}

/// The state of a listing's like relation after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// whether the user likes the listing now
    pub liked: bool,
    /// the like count after the toggle
    pub like_count: i64,
}

/// A page of browse results.
#[derive(Debug, Clone)]
pub struct BrowsePage {
    /// the listings on this page
    pub ads: Vec<ListingWithOwner>,
    /// total matches across all pages
    pub total_ads: i64,
    /// ceil(total / limit)
    pub num_of_pages: i64,
    /// the echoed page number
    pub page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_clamp_bad_input() {
        let p = PageParams::from_request(None, None);
        assert_eq!(p, PageParams { page: 1, limit: 20 });

        let p = PageParams::from_request(Some(0), Some(0));
        assert_eq!(p, PageParams { page: 1, limit: 1 });

        let p = PageParams::from_request(Some(-3), Some(5000));
        assert_eq!(p, PageParams { page: 1, limit: 100 });

        let p = PageParams::from_request(Some(3), Some(25));
        assert_eq!(p.skip(), 50);
    }

    #[test]
    fn page_math() {
        let p = PageParams { page: 1, limit: 20 };
        assert_eq!(p.num_of_pages(0), 0);
        assert_eq!(p.num_of_pages(1), 1);
        assert_eq!(p.num_of_pages(20), 1);
        assert_eq!(p.num_of_pages(21), 2);
        assert!(!p.has_more(20));
        assert!(p.has_more(21));

        let last = PageParams { page: 2, limit: 20 };
        assert!(!last.has_more(21));
    }

    #[test]
    fn fetch_mode_parsing() {
        assert_eq!(FetchMode::parse_or_default(Some("all")), FetchMode::All);
        assert_eq!(
            FetchMode::parse_or_default(Some("nearby")),
            FetchMode::Nearby
        );
        assert_eq!(FetchMode::parse_or_default(None), FetchMode::Nearby);
        assert_eq!(
            FetchMode::parse_or_default(Some("anything")),
            FetchMode::Nearby
        );
    }

    #[test]
    fn effective_location_discards_invalid_override() {
        let profile = SearcherProfile {
            has_opened_app: true,
            current_location: Some(GeoPoint::new(1.0, 1.0)),
            home_location: Some(GeoPoint::new(2.0, 2.0)),
        };
        assert_eq!(
            profile.effective_location(Some(GeoPoint::new(9.0, 9.0))),
            Some(GeoPoint::new(9.0, 9.0))
        );
        // out of range override, stored location wins
        assert_eq!(
            profile.effective_location(Some(GeoPoint::new(999.0, 0.0))),
            Some(GeoPoint::new(1.0, 1.0))
        );
        assert_eq!(
            profile.effective_location(None),
            Some(GeoPoint::new(1.0, 1.0))
        );
    }

    #[test]
    fn distance_defaults_when_absent_or_bad() {
        let mut q = NearbyQuery::default();
        assert_eq!(q.distance_km(), DEFAULT_DISTANCE_KM);
        q.distance_km = Some(-5.0);
        assert_eq!(q.distance_km(), DEFAULT_DISTANCE_KM);
        q.distance_km = Some(f64::NAN);
        assert_eq!(q.distance_km(), DEFAULT_DISTANCE_KM);
        q.distance_km = Some(25.0);
        assert_eq!(q.distance_km(), 25.0);
    }
}
