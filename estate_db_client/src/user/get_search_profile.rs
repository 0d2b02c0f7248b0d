use estate_geo::GeoPoint;
use sqlx::prelude::FromRow;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// The slice of a user record that steers search behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserSearchProfile {
    /// false until the app has been opened once; first-time users get the
    /// global feed instead of a geo search
    pub has_opened_app: bool,
    /// last reported live location, when the client shared one
    pub current_location: Option<GeoPoint>,
    /// stored home location, when set
    pub home_location: Option<GeoPoint>,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    #[sqlx(rename = "hasOpenedApp")]
    has_opened_app: bool,
    #[sqlx(rename = "currentLongitude")]
    current_longitude: Option<f64>,
    #[sqlx(rename = "currentLatitude")]
    current_latitude: Option<f64>,
    #[sqlx(rename = "homeLongitude")]
    home_longitude: Option<f64>,
    #[sqlx(rename = "homeLatitude")]
    home_latitude: Option<f64>,
}

fn point_from(longitude: Option<f64>, latitude: Option<f64>) -> Option<GeoPoint> {
    Some(GeoPoint::new(longitude?, latitude?))
}

/// Gets the search-steering slice of a user. `None` when the id does not
/// exist.
#[tracing::instrument(skip(db))]
pub async fn get_search_profile(
    db: &Pool<Postgres>,
    user_id: Uuid,
) -> anyhow::Result<Option<UserSearchProfile>> {
    let row: Option<ProfileRow> = sqlx::query_as(
        r#"
        SELECT
            u."hasOpenedApp",
            u."currentLongitude", u."currentLatitude",
            u."homeLongitude", u."homeLatitude"
        FROM "User" u
        WHERE u."id" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|row| UserSearchProfile {
        has_opened_app: row.has_opened_app,
        current_location: point_from(row.current_longitude, row.current_latitude),
        home_location: point_from(row.home_longitude, row.home_latitude),
    }))
}
