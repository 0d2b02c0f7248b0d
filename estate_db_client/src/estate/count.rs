use estate_filters::ListingPredicate;
use sqlx::{Pool, Postgres, QueryBuilder};

/// Counts listings matching `predicate`.
#[tracing::instrument(skip(db, predicate))]
pub async fn count_estates(
    db: &Pool<Postgres>,
    predicate: &ListingPredicate,
) -> anyhow::Result<i64> {
    let mut qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new(r#"SELECT COUNT(*) FROM "Estate" e WHERE TRUE"#);
    predicate.push_sql(&mut qb);

    let total: i64 = qb.build_query_scalar().fetch_one(db).await?;

    Ok(total)
}
