use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Deletes a listing. `false` when the id does not exist.
#[tracing::instrument(skip(db))]
pub async fn delete_estate(db: &Pool<Postgres>, estate_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM "Estate"
        WHERE "id" = $1
        "#,
    )
    .bind(estate_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
