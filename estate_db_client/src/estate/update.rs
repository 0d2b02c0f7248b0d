use chrono::{DateTime, Utc};
use estate_geo::GeoPoint;
use models_estate::{Category, ContactDetails, Photo, Pricing};
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::estate::pricing_columns;

/// The full replacement state for an update, assembled by the caller from
/// the stored listing plus the patch.
#[derive(Debug, Clone)]
pub struct EstateUpdate {
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
    pub taken: bool,
}

/// Overwrites the mutable columns of a listing. `false` when the id does
/// not exist.
#[tracing::instrument(skip(db, update))]
pub async fn update_estate(
    db: &Pool<Postgres>,
    estate_id: Uuid,
    update: &EstateUpdate,
) -> anyhow::Result<bool> {
    let (listing_type, price, rent_price, rent_frequency, deposit_amount, minimum_stay) =
        pricing_columns(&update.pricing);

    let result = sqlx::query(
        r#"
        UPDATE "Estate" SET
            "title" = $2,
            "description" = $3,
            "category" = $4,
            "listingType" = $5,
            "price" = $6,
            "rentPrice" = $7,
            "rentFrequency" = $8,
            "depositAmount" = $9,
            "minimumStay" = $10,
            "availableFrom" = $11,
            "isFurnished" = $12,
            "bedrooms" = $13,
            "bathrooms" = $14,
            "longitude" = $15,
            "latitude" = $16,
            "photo" = $17,
            "contactPhone" = $18,
            "contactEmail" = $19,
            "contactAddress" = $20,
            "taken" = $21,
            "updatedAt" = now()
        WHERE "id" = $1
        "#,
    )
    .bind(estate_id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.category.to_string())
    .bind(listing_type)
    .bind(price)
    .bind(rent_price)
    .bind(rent_frequency)
    .bind(deposit_amount)
    .bind(minimum_stay)
    .bind(update.available_from)
    .bind(update.is_furnished)
    .bind(update.bedrooms)
    .bind(update.bathrooms)
    .bind(update.location.longitude)
    .bind(update.location.latitude)
    .bind(Json(&update.photo))
    .bind(&update.contact_details.phone_number)
    .bind(&update.contact_details.email)
    .bind(&update.contact_details.address)
    .bind(update.taken)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
