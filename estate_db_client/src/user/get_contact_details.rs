use models_estate::ContactDetails;
use sqlx::prelude::FromRow;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct ContactRow {
    #[sqlx(rename = "phoneNumber")]
    phone_number: Option<String>,
    email: String,
    address: Option<String>,
}

/// Gets a user's stored contact details, the defaults a listing falls
/// back to when the create request omits them. `None` when the id does
/// not exist.
#[tracing::instrument(skip(db))]
pub async fn get_contact_details(
    db: &Pool<Postgres>,
    user_id: Uuid,
) -> anyhow::Result<Option<ContactDetails>> {
    let row: Option<ContactRow> = sqlx::query_as(
        r#"
        SELECT u."phoneNumber", u."email", u."address"
        FROM "User" u
        WHERE u."id" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|row| ContactDetails {
        phone_number: row.phone_number.unwrap_or_default(),
        email: row.email,
        address: row.address.unwrap_or_default(),
    }))
}
