use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Deletes all reviews attached to a listing, part of the listing delete
/// cascade. Returns how many were removed.
#[tracing::instrument(skip(db))]
pub async fn delete_reviews_for_estate(
    db: &Pool<Postgres>,
    estate_id: Uuid,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM "Review"
        WHERE "estateId" = $1
        "#,
    )
    .bind(estate_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}
