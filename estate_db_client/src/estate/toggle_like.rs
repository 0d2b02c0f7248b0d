use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// the state of a listing's like relation after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// whether the user likes the listing now
    pub liked: bool,
    /// the like count after the toggle
    pub like_count: i64,
}

/// Toggles a user's like on a listing.
///
/// One conditional statement, so concurrent toggles from the same user
/// settle as flips rather than double applies. RETURNING sees the updated
/// row, so the membership test there reports the new liked state.
/// Returns `None` when the id does not exist.
#[tracing::instrument(skip(db))]
pub async fn toggle_like(
    db: &Pool<Postgres>,
    estate_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<Option<LikeOutcome>> {
    let outcome: Option<(bool, i64)> = sqlx::query_as(
        r#"
        UPDATE "Estate"
        SET "likedBy" = CASE
                WHEN $2 = ANY("likedBy") THEN array_remove("likedBy", $2)
                ELSE array_append("likedBy", $2)
            END,
            "likeCount" = CASE
                WHEN $2 = ANY("likedBy") THEN "likeCount" - 1
                ELSE "likeCount" + 1
            END
        WHERE "id" = $1
        RETURNING $2 = ANY("likedBy"), "likeCount"
        "#,
    )
    .bind(estate_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(outcome.map(|(liked, like_count)| LikeOutcome { liked, like_count }))
}
