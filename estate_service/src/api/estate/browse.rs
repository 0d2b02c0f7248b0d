use axum::{
    Extension,
    extract::{self, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use estate_search::domain::models::BrowseQuery;
use models_estate::response::{BrowsePageResponse, ErrorResponse};
use models_estate::user::UserContext;

use crate::api::context::ApiContext;
use crate::api::estate::{BrowseParams, EstateError};

/// The browse feed: a plain catalogue page for a title search or
/// category, otherwise an expanding-radius search around the requester
#[utoipa::path(
    get,
    path = "/estate",
    operation_id = "browse_estates",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive title substring."),
        ("sort" = Option<String>, Query, description = "newest, oldest, a-z or z-a. Defaults to newest."),
        ("category" = Option<String>, Query, description = "Category name, or all."),
        ("page" = Option<i64>, Query, description = "The page. Defaults to 1."),
        ("limit" = Option<i64>, Query, description = "The page size. Defaults to 20, capped at 100."),
    ),
    responses(
        (status = 200, body = BrowsePageResponse),
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
    extract::Query(params): extract::Query<BrowseParams>,
) -> Result<Response, EstateError> {
    let query = BrowseQuery {
        sort: params.sort(),
        page: params.page(),
        filters: params.filters()?,
    };
    let page = ctx.engine.browse_page(user_context.user_id, query).await?;

    let result = BrowsePageResponse {
        total_ads: page.total_ads,
        num_of_pages: page.num_of_pages,
        ads: page.ads,
        page: page.page,
    };
    Ok((StatusCode::OK, Json(result)).into_response())
}
