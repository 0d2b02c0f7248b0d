use axum::{
    Extension,
    extract::{self, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use estate_db_client::estate::update::EstateUpdate;
use models_estate::Pricing;
use models_estate::request::{ListingValidationError, UpdateListingRequest};
use models_estate::response::{AdResponse, ErrorResponse};
use models_estate::user::UserContext;
use uuid::Uuid;

use crate::api::context::ApiContext;
use crate::api::estate::{EstateError, ensure_owner};

/// Update a listing the requester owns. Absent fields keep their stored
/// value; pricing re-validates against the effective listing type.
#[utoipa::path(
    put,
    path = "/estate/{id}",
    operation_id = "update_estate",
    params(
        ("id" = Uuid, Path, description = "The listing id."),
    ),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, body = AdResponse),
        (status = 400, body = ErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 403, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(ctx, user_context, req), fields(user_id = %user_context.user_id), err)]
pub async fn handler(
    State(ctx): State<ApiContext>,
    user_context: Extension<UserContext>,
    Path(estate_id): Path<Uuid>,
    extract::Json(req): extract::Json<UpdateListingRequest>,
) -> Result<Response, EstateError> {
    ensure_owner(&ctx.db, estate_id, user_context.user_id).await?;

    let existing = estate_db_client::estate::get::get_estate(&ctx.db, estate_id)
        .await?
        .ok_or(EstateError::NotFound)?
        .listing;

    let update = merge(existing, req)?;
    if !estate_db_client::estate::update::update_estate(&ctx.db, estate_id, &update).await? {
        return Err(EstateError::NotFound);
    }

    let ad = estate_db_client::estate::get::get_estate(&ctx.db, estate_id)
        .await?
        .ok_or(EstateError::NotFound)?;

    Ok((StatusCode::OK, Json(AdResponse { ad })).into_response())
}

/// Fold the patch over the stored listing into a full replacement state.
fn merge(
    existing: models_estate::Listing,
    req: UpdateListingRequest,
) -> Result<EstateUpdate, EstateError> {
    let listing_type = req
        .listing_type
        .unwrap_or_else(|| existing.pricing.listing_type());
    // the stored pricing parts, flattened so patch fields can override
    // them one by one
    let (price, rent_price, rent_frequency, deposit_amount, minimum_stay) = match existing.pricing {
        Pricing::Sale { price } => (Some(price), None, None, None, None),
        Pricing::Rental {
            rent_price,
            rent_frequency,
            deposit_amount,
            minimum_stay,
        } => (
            None,
            Some(rent_price),
            Some(rent_frequency),
            deposit_amount,
            minimum_stay,
        ),
    };
    let pricing = Pricing::from_parts(
        listing_type,
        req.price.or(price),
        req.rent_price.or(rent_price),
        req.rent_frequency.or(rent_frequency),
        req.deposit_amount.or(deposit_amount),
        req.minimum_stay.or(minimum_stay),
    )?;

    let title = req.title.unwrap_or(existing.title);
    if !(5..=100).contains(&title.chars().count()) {
        return Err(ListingValidationError::TitleLength.into());
    }
    let description = req.description.unwrap_or(existing.description);
    if !(10..=1000).contains(&description.chars().count()) {
        return Err(ListingValidationError::DescriptionLength.into());
    }
    let bedrooms = req.bedrooms.unwrap_or(existing.bedrooms);
    let bathrooms = req.bathrooms.unwrap_or(existing.bathrooms);
    if bedrooms < 0 || bathrooms < 0 {
        return Err(ListingValidationError::NegativeRooms.into());
    }

    let location = match req.location {
        Some(input) => input.into_point()?,
        None => existing.location,
    };
    let contact_details = match req.contact_details {
        Some(patch) => patch.merged_over(&existing.contact_details),
        None => existing.contact_details,
    };

    Ok(EstateUpdate {
        title,
        description,
        category: req.category.unwrap_or(existing.category),
        pricing,
        available_from: req.available_from.or(existing.available_from),
        is_furnished: req.is_furnished.or(existing.is_furnished),
        bedrooms,
        bathrooms,
        location,
        photo: req.photo.unwrap_or(existing.photo),
        contact_details,
        taken: req.taken.unwrap_or(existing.taken),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use estate_geo::GeoPoint;
    use models_estate::{Category, ContactDetails, ContactDetailsPatch, Listing, RentFrequency};

    fn stored_sale() -> Listing {
        Listing {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Two bed apartment".into(),
            description: "Bright two bed close to town".into(),
            category: Category::Apartment,
            pricing: Pricing::Sale { price: 150_000.0 },
            available_from: None,
            is_furnished: Some(false),
            bedrooms: 2,
            bathrooms: 1,
            location: GeoPoint::new(3.0, 4.0),
            photo: vec![],
            contact_details: ContactDetails {
                phone_number: "123".into(),
                email: "owner@example.com".into(),
                address: "1 Main St".into(),
            },
            taken: false,
            featured: false,
            average_rating: 0.0,
            num_of_reviews: 0,
            views_count: 0,
            viewed_by: vec![],
            like_count: 0,
            liked_by: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn absent_fields_keep_stored_values() {
        let existing = stored_sale();
        let update = merge(existing.clone(), UpdateListingRequest::default()).unwrap();
        assert_eq!(update.title, existing.title);
        assert_eq!(update.pricing, existing.pricing);
        assert_eq!(update.location, existing.location);
        assert!(!update.taken);
    }

    #[test]
    fn type_switch_revalidates_pricing() {
        let req = UpdateListingRequest {
            listing_type: Some(models_estate::ListingType::Rent),
            ..Default::default()
        };
        // the stored sale has no rent fields, so the switch alone fails
        assert!(matches!(
            merge(stored_sale(), req),
            Err(EstateError::BadRequest(_))
        ));

        let req = UpdateListingRequest {
            listing_type: Some(models_estate::ListingType::Rent),
            rent_price: Some(900.0),
            rent_frequency: Some(RentFrequency::Monthly),
            ..Default::default()
        };
        let update = merge(stored_sale(), req).unwrap();
        assert_eq!(
            update.pricing.listing_type(),
            models_estate::ListingType::Rent
        );
    }

    #[test]
    fn contact_patch_merges_partially() {
        let req = UpdateListingRequest {
            contact_details: Some(ContactDetailsPatch {
                phone_number: Some("456".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let update = merge(stored_sale(), req).unwrap();
        assert_eq!(update.contact_details.phone_number, "456");
        assert_eq!(update.contact_details.email, "owner@example.com");
    }

    #[test]
    fn short_title_is_rejected() {
        let req = UpdateListingRequest {
            title: Some("cozy".into()),
            ..Default::default()
        };
        assert!(matches!(
            merge(stored_sale(), req),
            Err(EstateError::BadRequest(_))
        ));
    }
}
