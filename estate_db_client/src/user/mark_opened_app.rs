use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Marks that a user has opened the app, ending their first-time feed.
#[tracing::instrument(skip(db))]
pub async fn mark_opened_app(db: &Pool<Postgres>, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE "User"
        SET "hasOpenedApp" = TRUE
        WHERE "id" = $1 AND NOT "hasOpenedApp"
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(())
}
