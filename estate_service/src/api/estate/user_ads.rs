use axum::{
    Extension,
    extract::{self, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use models_estate::response::{BrowsePageResponse, ErrorResponse};
use models_estate::user::UserContext;

use crate::api::context::ApiContext;
use crate::api::estate::{BrowseParams, EstateError};

/// The requester's own listings. Off-market entries stay visible here, so
/// the taken exclusion is skipped.
#[utoipa::path(
    get,
    path = "/estate/user-ads",
    operation_id = "user_ads",
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
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx, user_context, params), fields(user_id = %user_context.user_id), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    user_context: Extension<UserContext>,
    extract::Query(params): extract::Query<BrowseParams>,
) -> Result<Response, EstateError> {
    let mut filters = params.filters()?;
    filters.owner = Some(user_context.user_id);
    let predicate = filters.compile_open();
    let page = params.page();

    let (ads, total) = estate_db_client::estate::list::list_estates(
        &ctx.db,
        &predicate,
        params.sort(),
        page.skip(),
        page.limit,
    )
    .await?;

    let result = BrowsePageResponse {
        total_ads: total,
        num_of_pages: page.num_of_pages(total),
        ads,
        page: page.page,
    };
    Ok((StatusCode::OK, Json(result)).into_response())
}
