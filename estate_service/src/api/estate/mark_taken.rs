use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use models_estate::response::{ErrorResponse, MessageResponse};
use models_estate::user::UserContext;
use uuid::Uuid;

use crate::api::context::ApiContext;
use crate::api::estate::{EstateError, ensure_owner};

/// Toggle a listing on or off the market
#[utoipa::path(
    patch,
    path = "/estate/{id}/taken",
    operation_id = "toggle_estate_taken",
    params(
        ("id" = Uuid, Path, description = "The listing id."),
    ),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx, user_context), fields(user_id = %user_context.user_id), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    user_context: Extension<UserContext>,
    Path(estate_id): Path<Uuid>,
) -> Result<Response, EstateError> {
    ensure_owner(&ctx.db, estate_id, user_context.user_id).await?;

    let taken = estate_db_client::estate::mark_taken::toggle_taken(&ctx.db, estate_id)
        .await?
        .ok_or(EstateError::NotFound)?;

    let result = MessageResponse {
        msg: if taken {
            "estate marked as taken".to_string()
        } else {
            "estate marked as available".to_string()
        },
    };
    Ok((StatusCode::OK, Json(result)).into_response())
}
