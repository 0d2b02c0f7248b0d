use anyhow::anyhow;
use axum::{
    Extension,
    extract::{self, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use estate_db_client::estate::create::NewEstate;
use models_estate::request::CreateListingRequest;
use models_estate::response::{AdResponse, ErrorResponse};
use models_estate::user::UserContext;

use crate::api::context::ApiContext;
use crate::api::estate::EstateError;

/// Publish a new listing. Contact details omitted from the body fall back
/// to the owner's stored profile.
#[utoipa::path(
    post,
    path = "/estate",
    operation_id = "create_estate",
    request_body = CreateListingRequest,
    responses(
        (status = 201, body = AdResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx, user_context, req), fields(user_id = %user_context.user_id), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    user_context: Extension<UserContext>,
    extract::Json(req): extract::Json<CreateListingRequest>,
) -> Result<Response, EstateError> {
    req.validate()?;
    let pricing = req.pricing()?;
    let location = req.location.clone().into_point()?;

    let stored = estate_db_client::user::get_contact_details::get_contact_details(
        &ctx.db,
        user_context.user_id,
    )
    .await?
    .ok_or(EstateError::UserNotFound)?;
    let contact_details = req.contact_details.clone().merged_over(&stored);

    let estate = NewEstate {
        user_id: user_context.user_id,
        title: req.title,
        description: req.description,
        category: req.category,
        pricing,
        available_from: req.available_from,
        is_furnished: req.is_furnished,
        bedrooms: req.bedrooms,
        bathrooms: req.bathrooms,
        location,
        photo: req.photo,
        contact_details,
    };

    let estate_id = estate_db_client::estate::create::create_estate(&ctx.db, &estate).await?;
    let ad = estate_db_client::estate::get::get_estate(&ctx.db, estate_id)
        .await?
        .ok_or_else(|| EstateError::Internal(anyhow!("created listing {estate_id} not readable")))?;

    Ok((StatusCode::CREATED, Json(AdResponse { ad })).into_response())
}
