use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use models_estate::response::{AdResponse, ErrorResponse};
use uuid::Uuid;

use crate::api::context::ApiContext;
use crate::api::estate::EstateError;

/// A single listing with its owner profile
#[utoipa::path(
    get,
    path = "/estate/{id}",
    operation_id = "get_estate",
    params(
        ("id" = Uuid, Path, description = "The listing id."),
    ),
    responses(
        (status = 200, body = AdResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    Path(estate_id): Path<Uuid>,
) -> Result<Response, EstateError> {
    let ad = estate_db_client::estate::get::get_estate(&ctx.db, estate_id)
        .await?
        .ok_or(EstateError::NotFound)?;

    Ok((StatusCode::OK, Json(AdResponse { ad })).into_response())
}
