use chrono::{DateTime, Utc};
use estate_geo::GeoPoint;
use models_estate::{Category, ContactDetails, Photo, Pricing};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::estate::pricing_columns;

/// Everything needed to insert a listing, already validated upstream.
#[derive(Debug, Clone)]
pub struct NewEstate {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub pricing: Pricing,
    pub available_from: Option<DateTime<Utc>>,
    pub is_furnished: Option<bool>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub location: GeoPoint,
    pub photo: Vec<Photo>,
    pub contact_details: ContactDetails,
}

/// Inserts a listing and returns its generated id.
#[tracing::instrument(skip(db, estate), fields(user_id = %estate.user_id))]
pub async fn create_estate(db: &Pool<Postgres>, estate: &NewEstate) -> anyhow::Result<Uuid> {
    let (listing_type, price, rent_price, rent_frequency, deposit_amount, minimum_stay) =
        pricing_columns(&estate.pricing);

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO "Estate" (
            "userId", "title", "description", "category",
            "listingType", "price", "rentPrice", "rentFrequency",
            "depositAmount", "minimumStay", "availableFrom", "isFurnished",
            "bedrooms", "bathrooms", "longitude", "latitude", "photo",
            "contactPhone", "contactEmail", "contactAddress"
        )
        VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
            $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
        )
        RETURNING "id"
        "#,
    )
    .bind(estate.user_id)
    .bind(&estate.title)
    .bind(&estate.description)
    .bind(estate.category.to_string())
    .bind(listing_type)
    .bind(price)
    .bind(rent_price)
    .bind(rent_frequency)
    .bind(deposit_amount)
    .bind(minimum_stay)
    .bind(estate.available_from)
    .bind(estate.is_furnished)
    .bind(estate.bedrooms)
    .bind(estate.bathrooms)
    .bind(estate.location.longitude)
    .bind(estate.location.latitude)
    .bind(Json(&estate.photo))
    .bind(&estate.contact_details.phone_number)
    .bind(&estate.contact_details.email)
    .bind(&estate.contact_details.address)
    .fetch_one(db)
    .await?;

    Ok(id)
}
