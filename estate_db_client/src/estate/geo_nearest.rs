use estate_filters::ListingPredicate;
use estate_geo::GeoPoint;
use models_estate::ListingWithOwner;
use sqlx::prelude::FromRow;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::estate::{
    ESTATE_WITH_OWNER_SELECT, EstateWithOwnerRow, push_distance_meters, rows_into_listings,
};

#[derive(Debug, FromRow)]
struct CountedRow {
    #[sqlx(flatten)]
    estate: EstateWithOwnerRow,
    #[sqlx(rename = "totalCount")]
    total_count: i64,
}

/// [ESTATE_WITH_OWNER_SELECT] with a window count spliced into the column
/// list, still ending in `WHERE TRUE`.
fn select_with_count() -> String {
    ESTATE_WITH_OWNER_SELECT.replacen(
        "\nFROM \"Estate\" e",
        ",\n    COUNT(*) OVER () AS \"totalCount\"\nFROM \"Estate\" e",
        1,
    )
}

/// Nearest-first search: listings matching `predicate` within
/// `max_distance_m` meters of `origin`, ordered by ascending distance.
///
/// The total match count is taken in the same pass with a window count,
/// so a page and its total always come from one consistent snapshot.
#[tracing::instrument(skip(db, predicate))]
pub async fn geo_nearest(
    db: &Pool<Postgres>,
    origin: GeoPoint,
    max_distance_m: f64,
    predicate: &ListingPredicate,
    skip: i64,
    limit: i64,
) -> anyhow::Result<(Vec<ListingWithOwner>, i64)> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(select_with_count());
    qb.push(" AND ");
    push_distance_meters(&mut qb, origin);
    qb.push(" <= ");
    qb.push_bind(max_distance_m);
    predicate.push_sql(&mut qb);
    qb.push(" ORDER BY ");
    push_distance_meters(&mut qb, origin);
    qb.push(" ASC OFFSET ");
    qb.push_bind(skip);
    qb.push(" LIMIT ");
    qb.push_bind(limit);

    let rows: Vec<CountedRow> = qb.build_query_as().fetch_all(db).await?;
    let total = rows.first().map(|row| row.total_count).unwrap_or(0);
    let estates = rows_into_listings(rows.into_iter().map(|row| row.estate).collect())?;

    Ok((estates, total))
}
