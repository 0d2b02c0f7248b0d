use estate_filters::ListingPredicate;
use estate_geo::{GeoPoint, km_to_meters};
use models_estate::{ListingWithOwner, SortOption};
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::estate::{ESTATE_WITH_OWNER_SELECT, EstateWithOwnerRow, order_by, push_distance_meters, rows_into_listings};

/// Counts listings matching `predicate` within `radius_km` of `origin`.
/// Drives the radius expansion loop, which only needs the count.
#[tracing::instrument(skip(db, predicate))]
pub async fn count_within_radius(
    db: &Pool<Postgres>,
    origin: GeoPoint,
    radius_km: f64,
    predicate: &ListingPredicate,
) -> anyhow::Result<i64> {
    let mut qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(r#"SELECT COUNT(*) FROM "Estate" e WHERE TRUE AND "#);
    push_distance_meters(&mut qb, origin);
    qb.push(" <= ");
    qb.push_bind(km_to_meters(radius_km));
    predicate.push_sql(&mut qb);

    let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

    Ok(total)
}

/// Fetches a page of listings matching `predicate` within `radius_km` of
/// `origin`, ordered by `sort` rather than by distance.
#[tracing::instrument(skip(db, predicate))]
pub async fn geo_within(
    db: &Pool<Postgres>,
    origin: GeoPoint,
    radius_km: f64,
    predicate: &ListingPredicate,
    sort: SortOption,
    skip: i64,
    limit: i64,
) -> anyhow::Result<Vec<ListingWithOwner>> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(ESTATE_WITH_OWNER_SELECT);
    qb.push(" AND ");
    push_distance_meters(&mut qb, origin);
    qb.push(" <= ");
    qb.push_bind(km_to_meters(radius_km));
    predicate.push_sql(&mut qb);
    qb.push(order_by(sort));
    qb.push(" OFFSET ");
    qb.push_bind(skip);
    qb.push(" LIMIT ");
    qb.push_bind(limit);

    let rows: Vec<EstateWithOwnerRow> = qb.build_query_as().fetch_all(db).await?;

    rows_into_listings(rows)
}
