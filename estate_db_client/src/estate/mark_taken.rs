use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Flips the taken flag and returns the new value. `None` when the id
/// does not exist.
#[tracing::instrument(skip(db))]
pub async fn toggle_taken(db: &Pool<Postgres>, estate_id: Uuid) -> anyhow::Result<Option<bool>> {
    let taken: Option<bool> = sqlx::query_scalar(
        r#"
        UPDATE "Estate"
        SET "taken" = NOT "taken", "updatedAt" = now()
        WHERE "id" = $1
        RETURNING "taken"
        "#,
    )
    .bind(estate_id)
    .fetch_optional(db)
    .await?;

    Ok(taken)
}
