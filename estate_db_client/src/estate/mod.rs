//! Queries against the `"Estate"` table.

use anyhow::Context;
use chrono::{DateTime, Utc};
use estate_geo::GeoPoint;
use models_estate::{
    ContactDetails, Listing, ListingWithOwner, OwnerProfile, Photo, Pricing, RentFrequency,
    SortOption,
};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

pub mod count;
pub mod create;
pub mod delete;
pub mod geo_nearest;
pub mod geo_within;
pub mod get;
pub mod increment_view;
pub mod list;
pub mod mark_taken;
pub mod toggle_like;
pub mod update;

/// The shared SELECT for a listing with its joined owner profile. Every
/// query that returns listings starts from this text so the row type below
/// always lines up.
pub(crate) const ESTATE_WITH_OWNER_SELECT: &str = r#"
SELECT
    e."id", e."userId", e."title", e."description", e."category",
    e."listingType", e."price", e."rentPrice", e."rentFrequency",
    e."depositAmount", e."minimumStay", e."availableFrom", e."isFurnished",
    e."bedrooms", e."bathrooms", e."longitude", e."latitude", e."photo",
    e."contactPhone", e."contactEmail", e."contactAddress", e."taken",
    e."averageRating", e."numOfReviews", e."viewsCount", e."viewedBy",
    e."likeCount", e."likedBy", e."createdAt", e."updatedAt",
    u."id" AS "ownerId", u."username", u."avatar",
    u."email" AS "ownerEmail", u."status", u."lastSeen"
FROM "Estate" e
JOIN "User" u ON u."id" = e."userId"
WHERE TRUE"#;

/// One row of [ESTATE_WITH_OWNER_SELECT].
#[derive(Debug, FromRow)]
pub(crate) struct EstateWithOwnerRow {
    pub id: Uuid,
    #[sqlx(rename = "userId")]
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    #[sqlx(rename = "listingType")]
    pub listing_type: String,
    pub price: Option<f64>,
    #[sqlx(rename = "rentPrice")]
    pub rent_price: Option<f64>,
    #[sqlx(rename = "rentFrequency")]
    pub rent_frequency: Option<String>,
    #[sqlx(rename = "depositAmount")]
    pub deposit_amount: Option<f64>,
    #[sqlx(rename = "minimumStay")]
    pub minimum_stay: Option<i32>,
    #[sqlx(rename = "availableFrom")]
    pub available_from: Option<DateTime<Utc>>,
    #[sqlx(rename = "isFurnished")]
    pub is_furnished: Option<bool>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub longitude: f64,
    pub latitude: f64,
    pub photo: Json<Vec<Photo>>,
    #[sqlx(rename = "contactPhone")]
    pub contact_phone: String,
    #[sqlx(rename = "contactEmail")]
    pub contact_email: String,
    #[sqlx(rename = "contactAddress")]
    pub contact_address: String,
    pub taken: bool,
    #[sqlx(rename = "averageRating")]
    pub average_rating: f64,
    #[sqlx(rename = "numOfReviews")]
    pub num_of_reviews: i32,
    #[sqlx(rename = "viewsCount")]
    pub views_count: i64,
    #[sqlx(rename = "viewedBy")]
    pub viewed_by: Vec<Uuid>,
    #[sqlx(rename = "likeCount")]
    pub like_count: i64,
    #[sqlx(rename = "likedBy")]
    pub liked_by: Vec<Uuid>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[sqlx(rename = "ownerId")]
    pub owner_id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
    #[sqlx(rename = "ownerEmail")]
    pub owner_email: String,
    pub status: String,
    #[sqlx(rename = "lastSeen")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl EstateWithOwnerRow {
    /// Assemble the API shape, recomputing the derived featured flag as of
    /// `now` (it is never trusted from storage).
    pub(crate) fn into_listing_with_owner(
        self,
        now: DateTime<Utc>,
    ) -> anyhow::Result<ListingWithOwner> {
        let listing_type = self
            .listing_type
            .parse()
            .with_context(|| format!("bad listingType on estate {}", self.id))?;
        let rent_frequency: Option<RentFrequency> = self
            .rent_frequency
            .as_deref()
            .map(str::parse)
            .transpose()
            .with_context(|| format!("bad rentFrequency on estate {}", self.id))?;
        let pricing = Pricing::from_parts(
            listing_type,
            self.price,
            self.rent_price,
            rent_frequency,
            self.deposit_amount,
            self.minimum_stay,
        )
        .with_context(|| format!("bad pricing on estate {}", self.id))?;

        let mut listing = Listing {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            category: self
                .category
                .parse()
                .with_context(|| format!("bad category on estate {}", self.id))?,
            pricing,
            available_from: self.available_from,
            is_furnished: self.is_furnished,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            location: GeoPoint::new(self.longitude, self.latitude),
            photo: self.photo.0,
            contact_details: ContactDetails {
                phone_number: self.contact_phone,
                email: self.contact_email,
                address: self.contact_address,
            },
            taken: self.taken,
            featured: false,
            average_rating: self.average_rating,
            num_of_reviews: self.num_of_reviews,
            views_count: self.views_count,
            viewed_by: self.viewed_by,
            like_count: self.like_count,
            liked_by: self.liked_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        listing.refresh_featured(now);

        Ok(ListingWithOwner {
            listing,
            user: OwnerProfile {
                id: self.owner_id,
                username: self.username,
                avatar: self.avatar,
                email: self.owner_email,
                status: self
                    .status
                    .parse()
                    .with_context(|| format!("bad status on user {}", self.owner_id))?,
                last_seen: self.last_seen,
            },
        })
    }
}

/// map rows into the API shape with one `now` for the whole page
pub(crate) fn rows_into_listings(
    rows: Vec<EstateWithOwnerRow>,
) -> anyhow::Result<Vec<ListingWithOwner>> {
    let now = Utc::now();
    rows.into_iter()
        .map(|row| row.into_listing_with_owner(now))
        .collect()
}

/// the ORDER BY fragment for a sort option
pub(crate) fn order_by(sort: SortOption) -> &'static str {
    match sort {
        SortOption::Newest => r#" ORDER BY e."createdAt" DESC"#,
        SortOption::Oldest => r#" ORDER BY e."createdAt" ASC"#,
        SortOption::TitleAsc => r#" ORDER BY e."title" ASC"#,
        SortOption::TitleDesc => r#" ORDER BY e."title" DESC"#,
    }
}

/// append haversine distance from `origin` to the estate row, in meters
pub(crate) fn push_distance_meters(qb: &mut QueryBuilder<'_, Postgres>, origin: GeoPoint) {
    qb.push("2.0 * 6378100.0 * asin(sqrt(pow(sin(radians(e.\"latitude\" - ");
    qb.push_bind(origin.latitude);
    qb.push(") / 2.0), 2) + cos(radians(");
    qb.push_bind(origin.latitude);
    qb.push(")) * cos(radians(e.\"latitude\")) * pow(sin(radians(e.\"longitude\" - ");
    qb.push_bind(origin.longitude);
    qb.push(") / 2.0), 2)))");
}

/// split a pricing shape into the nullable column values
pub(crate) fn pricing_columns(
    pricing: &Pricing,
) -> (
    String,
    Option<f64>,
    Option<f64>,
    Option<String>,
    Option<f64>,
    Option<i32>,
) {
    match pricing {
        Pricing::Sale { price } => (
            pricing.listing_type().to_string(),
            Some(*price),
            None,
            None,
            None,
            None,
        ),
        Pricing::Rental {
            rent_price,
            rent_frequency,
            deposit_amount,
            minimum_stay,
        } => (
            pricing.listing_type().to_string(),
            None,
            Some(*rent_price),
            Some(rent_frequency.to_string()),
            *deposit_amount,
            *minimum_stay,
        ),
    }
}
