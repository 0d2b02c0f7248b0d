use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Gets a user's push token. `None` when the id does not exist or no
/// token has been registered.
#[tracing::instrument(skip(db))]
pub async fn get_push_token(db: &Pool<Postgres>, user_id: Uuid) -> anyhow::Result<Option<String>> {
    let token: Option<Option<String>> = sqlx::query_scalar(
        r#"
        SELECT u."pushToken"
        FROM "User" u
        WHERE u."id" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(token.flatten())
}
