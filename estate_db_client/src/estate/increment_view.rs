use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Records a distinct view: appends the viewer and bumps the counter in
/// one statement, guarded so a repeat viewer changes nothing.
///
/// Returns the current view count after the call, or `None` when the id
/// does not exist.
#[tracing::instrument(skip(db))]
pub async fn increment_view(
    db: &Pool<Postgres>,
    estate_id: Uuid,
    viewer: Uuid,
) -> anyhow::Result<Option<i64>> {
    let counted: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE "Estate"
        SET "viewedBy" = array_append("viewedBy", $2),
            "viewsCount" = "viewsCount" + 1
        WHERE "id" = $1 AND NOT ($2 = ANY("viewedBy"))
        RETURNING "viewsCount"
        "#,
    )
    .bind(estate_id)
    .bind(viewer)
    .fetch_optional(db)
    .await?;

    if let Some(count) = counted {
        return Ok(Some(count));
    }

    // repeat view, or unknown id
    get_views_count(db, estate_id).await
}

/// Reads the view count. `None` when the id does not exist.
#[tracing::instrument(skip(db))]
pub async fn get_views_count(db: &Pool<Postgres>, estate_id: Uuid) -> anyhow::Result<Option<i64>> {
    let count: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT e."viewsCount"
        FROM "Estate" e
        WHERE e."id" = $1
        "#,
    )
    .bind(estate_id)
    .fetch_optional(db)
    .await?;

    Ok(count)
}
