use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use models_estate::response::{ErrorResponse, LikeToggleResponse};
use models_estate::user::UserContext;
use push_notify_client::{PushMessage, PushNotifyClient};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::context::ApiContext;
use crate::api::estate::EstateError;

/// Toggle the requester's like on a listing. A fresh like pings the
/// owner's device; unlikes stay silent.
#[utoipa::path(
    post,
    path = "/estate/{id}/like",
    operation_id = "like_estate",
    params(
        ("id" = Uuid, Path, description = "The listing id."),
    ),
    responses(
        (status = 200, body = LikeToggleResponse),
        (status = 401, body = ErrorResponse),
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
    let outcome = ctx
        .engagement
        .toggle_like(estate_id, user_context.user_id)
        .await?
        .ok_or(EstateError::NotFound)?;

    if outcome.liked {
        // fire and forget; the response never waits on delivery
        tokio::spawn(notify_owner(
            ctx.db.clone(),
            ctx.push_client.clone(),
            estate_id,
            user_context.user_id,
        ));
    }

    let result = LikeToggleResponse {
        liked: outcome.liked,
        like_count: outcome.like_count,
    };
    Ok((StatusCode::OK, Json(result)).into_response())
}

async fn notify_owner(db: PgPool, push: Arc<PushNotifyClient>, estate_id: Uuid, liker: Uuid) {
    if let Err(err) = try_notify_owner(&db, &push, estate_id, liker).await {
        tracing::warn!(%estate_id, error = ?err, "failed to send like notification");
    }
}

async fn try_notify_owner(
    db: &PgPool,
    push: &PushNotifyClient,
    estate_id: Uuid,
    liker: Uuid,
) -> anyhow::Result<()> {
    let Some(ad) = estate_db_client::estate::get::get_estate(db, estate_id).await? else {
        return Ok(());
    };
    let owner = ad.listing.user_id;
    if owner == liker {
        return Ok(());
    }
    let Some(token) = estate_db_client::user::get_push_token::get_push_token(db, owner).await?
    else {
        return Ok(());
    };

    let message = PushMessage::new(
        token,
        "Someone likes your property".to_string(),
        format!("Your listing \"{}\" just got a new like", ad.listing.title),
    );
    push.send_push(&message).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use estate_search::domain::models::LikeToggle;
    use estate_search::domain::services::EngagementServiceImpl;
    use estate_search::outbound::mock::MockEngagementStorePort;
    use uuid::Uuid;

    #[tokio::test]
    async fn toggle_reports_the_store_outcome() {
        let estate_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let mut store = MockEngagementStorePort::new();
        store
            .expect_toggle_like()
            .times(1)
            .withf(move |id, who| {
                assert_eq!(*id, estate_id);
                assert_eq!(*who, user_id);
                true
            })
            .returning(|_, _| {
                Box::pin(async {
                    Ok(Some(LikeToggle {
                        liked: true,
                        like_count: 4,
                    }))
                })
            });

        let service = EngagementServiceImpl::new(store);
        let outcome = service
            .toggle_like(estate_id, user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.liked);
        assert_eq!(outcome.like_count, 4);
    }

    #[tokio::test]
    async fn toggle_on_unknown_listing_is_none() {
        let mut store = MockEngagementStorePort::new();
        store
            .expect_toggle_like()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let service = EngagementServiceImpl::new(store);
        let outcome = service
            .toggle_like(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert!(outcome.is_none());
    }
}
