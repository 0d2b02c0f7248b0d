use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use models_estate::response::{ErrorResponse, ViewCountResponse};
use models_estate::user::UserContext;
use uuid::Uuid;

use crate::api::context::ApiContext;
use crate::api::estate::EstateError;

/// Record a view and return the current count. Signed-in viewers count
/// once each; anonymous requests only read the counter.
#[utoipa::path(
    post,
    path = "/estate/{id}/view",
    operation_id = "view_estate",
    params(
        ("id" = Uuid, Path, description = "The listing id."),
    ),
    responses(
        (status = 200, body = ViewCountResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx, user_context), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    user_context: Option<Extension<UserContext>>,
    Path(estate_id): Path<Uuid>,
) -> Result<Response, EstateError> {
    let viewer = user_context.map(|Extension(user)| user.user_id);
    let views_count = ctx
        .engagement
        .view(estate_id, viewer)
        .await?
        .ok_or(EstateError::NotFound)?;

    Ok((StatusCode::OK, Json(ViewCountResponse { views_count })).into_response())
}
