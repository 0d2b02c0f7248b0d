use estate_filters::ListingPredicate;
use models_estate::{ListingWithOwner, SortOption};
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::estate::{ESTATE_WITH_OWNER_SELECT, EstateWithOwnerRow, order_by, rows_into_listings};

/// Lists listings matching `predicate`, sorted and paginated, together
/// with the total match count across all pages.
#[tracing::instrument(skip(db, predicate))]
pub async fn list_estates(
    db: &Pool<Postgres>,
    predicate: &ListingPredicate,
    sort: SortOption,
    skip: i64,
    limit: i64,
) -> anyhow::Result<(Vec<ListingWithOwner>, i64)> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(ESTATE_WITH_OWNER_SELECT);
    predicate.push_sql(&mut qb);
    qb.push(order_by(sort));
    qb.push(" OFFSET ");
    qb.push_bind(skip);
    qb.push(" LIMIT ");
    qb.push_bind(limit);

    let rows: Vec<EstateWithOwnerRow> = qb.build_query_as().fetch_all(db).await?;
    let total = super::count::count_estates(db, predicate).await?;

    Ok((rows_into_listings(rows)?, total))
}
