use models_estate::ListingWithOwner;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::estate::{ESTATE_WITH_OWNER_SELECT, EstateWithOwnerRow};

/// Gets a single listing with its owner profile. `None` when the id does
/// not exist.
#[tracing::instrument(skip(db))]
pub async fn get_estate(
    db: &Pool<Postgres>,
    estate_id: Uuid,
) -> anyhow::Result<Option<ListingWithOwner>> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(ESTATE_WITH_OWNER_SELECT);
    qb.push(r#" AND e."id" = "#);
    qb.push_bind(estate_id);

    let row: Option<EstateWithOwnerRow> = qb.build_query_as().fetch_optional(db).await?;

    row.map(|row| row.into_listing_with_owner(chrono::Utc::now()))
        .transpose()
}

/// Gets the owner id of a listing, for ownership checks before mutations.
#[tracing::instrument(skip(db))]
pub async fn get_estate_owner(
    db: &Pool<Postgres>,
    estate_id: Uuid,
) -> anyhow::Result<Option<Uuid>> {
    let owner: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT e."userId"
        FROM "Estate" e
        WHERE e."id" = $1
        "#,
    )
    .bind(estate_id)
    .fetch_optional(db)
    .await?;

    Ok(owner)
}
