use axum::{
    Json, Router, middleware,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use estate_filters::{ListingFilters, UnknownFilterValue, boolish, category_filter, listing_type_filter};
use estate_geo::GeoPoint;
use estate_search::domain::models::{FetchMode, NearbyQuery, PageParams};
use estate_search::domain::services::SearchError;
use models_estate::ListingType;
use models_estate::pricing::PricingError;
use models_estate::listing::LocationParseError;
use models_estate::request::ListingValidationError;
use models_estate::response::ErrorResponse;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::auth;
use crate::api::context::ApiContext;

pub(in crate::api) mod browse;
pub(in crate::api) mod create;
pub(in crate::api) mod delete_ad;
pub(in crate::api) mod get_ad;
pub(in crate::api) mod like;
pub(in crate::api) mod mark_taken;
pub(in crate::api) mod nearby;
pub(in crate::api) mod rent;
pub(in crate::api) mod search;
pub(in crate::api) mod update;
pub(in crate::api) mod user_ads;
pub(in crate::api) mod view;

pub fn router(state: &ApiContext) -> Router<ApiContext> {
    let authed = Router::new()
        .route("/nearby", get(nearby::handler))
        .route("/rent", get(rent::handler))
        .route("/search", get(search::handler))
        .route("/user-ads", get(user_ads::handler))
        .route("/", get(browse::handler).post(create::handler))
        .route(
            "/{id}",
            get(get_ad::handler)
                .put(update::handler)
                .delete(delete_ad::handler),
        )
        .route("/{id}/taken", patch(mark_taken::handler))
        .route("/{id}/like", post(like::handler))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth::require_user,
        ));

    // views also count for signed-out traffic, so this route only attaches
    // the user when a token is present
    let open = Router::new()
        .route("/{id}/view", post(view::handler))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth::attach_user,
        ));

    authed.merge(open)
}

#[derive(thiserror::Error, Debug)]
pub enum EstateError {
    /// the requesting user id resolves to no user
    #[error("user not found")]
    UserNotFound,
    /// no such listing
    #[error("estate not found")]
    NotFound,
    /// malformed filter input or request body
    #[error("{0}")]
    BadRequest(String),
    /// a mutation on someone else's listing
    #[error("you do not own this estate")]
    NotOwner,
    /// storage failure
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<SearchError> for EstateError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::UserNotFound => EstateError::UserNotFound,
            SearchError::Storage(e) => EstateError::Internal(e),
        }
    }
}

impl From<UnknownFilterValue> for EstateError {
    fn from(e: UnknownFilterValue) -> Self {
        EstateError::BadRequest(e.to_string())
    }
}

impl From<PricingError> for EstateError {
    fn from(e: PricingError) -> Self {
        EstateError::BadRequest(e.to_string())
    }
}

impl From<LocationParseError> for EstateError {
    fn from(e: LocationParseError) -> Self {
        EstateError::BadRequest(e.to_string())
    }
}

impl From<ListingValidationError> for EstateError {
    fn from(e: ListingValidationError) -> Self {
        EstateError::BadRequest(e.to_string())
    }
}

impl IntoResponse for EstateError {
    fn into_response(self) -> Response {
        let status_code = match self {
            EstateError::UserNotFound | EstateError::NotFound => StatusCode::NOT_FOUND,
            EstateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            EstateError::NotOwner => StatusCode::FORBIDDEN,
            EstateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status_code,
            Json(ErrorResponse {
                message: self.to_string().as_str(),
            }),
        )
            .into_response()
    }
}

/// The query string accepted by the nearby/rent/search endpoints.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub distance: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub listing_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub furnished: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rent_frequency: Option<String>,
    pub available_from: Option<DateTime<Utc>>,
    pub fetch_mode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SearchParams {
    /// Build the filter bundle, with `forced` overriding any listingType
    /// in the query string (the /estate/rent route).
    fn filters(&self, forced: Option<ListingType>) -> Result<ListingFilters, EstateError> {
        let listing_type = match forced {
            Some(t) => Some(t),
            None => listing_type_filter(self.listing_type.as_deref())?,
        };
        let rent_frequency = self
            .rent_frequency
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|_| EstateError::BadRequest("unknown rentFrequency value".to_string()))?;

        Ok(ListingFilters {
            listing_type,
            min_price: self.min_price,
            max_price: self.max_price,
            furnished: boolish(self.furnished.as_deref()),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            rent_frequency,
            available_before: self.available_from,
            category: None,
            title_search: None,
            owner: None,
        })
    }

    /// assemble the engine query; explicit coordinates ride along raw and
    /// are validated (or discarded) during location resolution
    pub fn nearby_query(&self, forced: Option<ListingType>) -> Result<NearbyQuery, EstateError> {
        let location_override = match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
            _ => None,
        };

        Ok(NearbyQuery {
            location_override,
            distance_km: self.distance,
            fetch_mode: FetchMode::parse_or_default(self.fetch_mode.as_deref()),
            page: PageParams::from_request(self.page, self.limit),
            filters: self.filters(forced)?,
        })
    }
}

/// The query string accepted by the browse and user-ads endpoints.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl BrowseParams {
    pub fn filters(&self) -> Result<ListingFilters, EstateError> {
        let title_search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ListingFilters {
            category: category_filter(self.category.as_deref())?,
            title_search,
            ..Default::default()
        })
    }

    pub fn sort(&self) -> models_estate::SortOption {
        models_estate::SortOption::parse_or_default(self.sort.as_deref())
    }

    pub fn page(&self) -> PageParams {
        PageParams::from_request(self.page, self.limit)
    }
}

/// The nearby, rent and search endpoints differ only in the forced
/// listing type, so they share this body.
pub(in crate::api) async fn run_search(
    ctx: &ApiContext,
    user_id: Uuid,
    params: SearchParams,
    forced: Option<ListingType>,
) -> Result<models_estate::response::SearchPageResponse, EstateError> {
    let query = params.nearby_query(forced)?;
    let page = ctx.engine.nearby_page(user_id, query).await?;

    Ok(models_estate::response::SearchPageResponse {
        ads: page.ads,
        total: page.total,
        num_of_pages: page.num_of_pages,
        page: page.page,
        is_nearby_data: page.is_nearby_data,
        has_more_nearby: page.has_more_nearby,
    })
}

/// 404 when the listing is missing, 403 when it belongs to someone else.
pub(crate) async fn ensure_owner(
    db: &PgPool,
    estate_id: Uuid,
    user_id: Uuid,
) -> Result<(), EstateError> {
    match estate_db_client::estate::get::get_estate_owner(db, estate_id).await? {
        None => Err(EstateError::NotFound),
        Some(owner) if owner == user_id => Ok(()),
        Some(_) => Err(EstateError::NotOwner),
    }
}
