use axum::{
    Extension,
    extract::{self, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use models_estate::response::{ErrorResponse, SearchPageResponse};
use models_estate::user::UserContext;

use crate::api::context::ApiContext;
use crate::api::estate::{EstateError, SearchParams, run_search};

/// Alias of the nearby search kept for older clients
#[utoipa::path(
    get,
    path = "/estate/search",
    operation_id = "search_estates",
    params(
        ("distance" = Option<f64>, Query, description = "Search radius in kilometers. Defaults to 10."),
        ("page" = Option<i64>, Query, description = "The page. Defaults to 1."),
        ("limit" = Option<i64>, Query, description = "The page size. Defaults to 20, capped at 100."),
        ("listingType" = Option<String>, Query, description = "sale, rent, or all."),
        ("minPrice" = Option<f64>, Query, description = "Lower price bound."),
        ("maxPrice" = Option<f64>, Query, description = "Upper price bound."),
        ("furnished" = Option<String>, Query, description = "true or false."),
        ("bedrooms" = Option<i32>, Query, description = "Exact bedroom count."),
        ("bathrooms" = Option<i32>, Query, description = "Exact bathroom count."),
        ("rentFrequency" = Option<String>, Query, description = "daily, weekly, monthly or yearly."),
        ("availableFrom" = Option<String>, Query, description = "Only listings available on or before this date."),
        ("fetchMode" = Option<String>, Query, description = "`all` skips the geo search entirely."),
        ("latitude" = Option<f64>, Query, description = "Override latitude, paired with longitude."),
        ("longitude" = Option<f64>, Query, description = "Override longitude, paired with latitude."),
    ),
    responses(
        (status = 200, body = SearchPageResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx, user_context, params), fields(user_id = %user_context.user_id), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    user_context: Extension<UserContext>,
    extract::Query(params): extract::Query<SearchParams>,
) -> Result<Response, EstateError> {
    let result = run_search(&ctx, user_context.user_id, params, None).await?;

    Ok((StatusCode::OK, Json(result)).into_response())
}
