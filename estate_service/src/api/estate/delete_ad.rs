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

/// Delete a listing the requester owns, together with its reviews
#[utoipa::path(
    delete,
    path = "/estate/{id}",
    operation_id = "delete_estate",
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

    if !estate_db_client::estate::delete::delete_estate(&ctx.db, estate_id).await? {
        return Err(EstateError::NotFound);
    }

    // the listing is gone either way; a failed review sweep only gets logged
    if let Err(err) =
        estate_db_client::review::delete_for_estate::delete_reviews_for_estate(&ctx.db, estate_id)
            .await
    {
        tracing::warn!(%estate_id, error = ?err, "failed to delete reviews for estate");
    }

    let result = MessageResponse {
        msg: "estate deleted successfully".to_string(),
    };
    Ok((StatusCode::OK, Json(result)).into_response())
}
