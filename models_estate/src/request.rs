//! Request bodies for the listing CRUD surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::listing::{Category, ContactDetailsPatch, ListingType, LocationInput, Photo, RentFrequency};
use crate::pricing::{Pricing, PricingError};

/// why a create/update request failed validation
#[derive(Debug, Error)]
pub enum ListingValidationError {
    /// title outside 5..=100 characters
    #[error("title must be between 5 and 100 characters")]
    TitleLength,
    /// description outside 10..=1000 characters
    #[error("description must be between 10 and 1000 characters")]
    DescriptionLength,
    /// negative room counts
    #[error("bedrooms and bathrooms cannot be negative")]
    NegativeRooms,
    /// pricing parts incomplete or out of range
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Body for `POST /estate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    /// short headline
    pub title: String,
    /// full description
    pub description: String,
    /// property category
    pub category: Category,
    /// sale or rent
    pub listing_type: ListingType,
    /// asking price, required for sales
    #[serde(default)]
    pub price: Option<f64>,
    /// rent amount, required for rentals
    #[serde(default)]
    pub rent_price: Option<f64>,
    /// billing cadence, required for rentals
    #[serde(default)]
    pub rent_frequency: Option<RentFrequency>,
    /// optional deposit
    #[serde(default)]
    pub deposit_amount: Option<f64>,
    /// optional minimum stay
    #[serde(default)]
    pub minimum_stay: Option<i32>,
    /// earliest move-in date
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    /// furnished flag
    #[serde(default)]
    pub is_furnished: Option<bool>,
    /// bedroom count, defaults to 0
    #[serde(default)]
    pub bedrooms: i32,
    /// bathroom count, defaults to 0
    #[serde(default)]
    pub bathrooms: i32,
    /// where the property is, in any accepted shape
    pub location: LocationInput,
    /// already uploaded photo references
    #[serde(default)]
    pub photo: Vec<Photo>,
    /// overrides merged over the owner's stored contact details
    #[serde(default)]
    pub contact_details: ContactDetailsPatch,
}

impl CreateListingRequest {
    /// build the validated pricing shape for this request
    pub fn pricing(&self) -> Result<Pricing, PricingError> {
        Pricing::from_parts(
            self.listing_type,
            self.price,
            self.rent_price,
            self.rent_frequency,
            self.deposit_amount,
            self.minimum_stay,
        )
    }

    /// check the scalar field bounds
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if !(5..=100).contains(&self.title.chars().count()) {
            return Err(ListingValidationError::TitleLength);
        }
        if !(10..=1000).contains(&self.description.chars().count()) {
            return Err(ListingValidationError::DescriptionLength);
        }
        if self.bedrooms < 0 || self.bathrooms < 0 {
            return Err(ListingValidationError::NegativeRooms);
        }
        Ok(())
    }
}

/// Body for `PUT /estate/{id}`; every field optional, absent fields keep
/// their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    /// new headline
    #[serde(default)]
    pub title: Option<String>,
    /// new description
    #[serde(default)]
    pub description: Option<String>,
    /// new category
    #[serde(default)]
    pub category: Option<Category>,
    /// switch listing type; re-validates pricing against the new type
    #[serde(default)]
    pub listing_type: Option<ListingType>,
    /// new asking price
    #[serde(default)]
    pub price: Option<f64>,
    /// new rent amount
    #[serde(default)]
    pub rent_price: Option<f64>,
    /// new billing cadence
    #[serde(default)]
    pub rent_frequency: Option<RentFrequency>,
    /// new deposit
    #[serde(default)]
    pub deposit_amount: Option<f64>,
    /// new minimum stay
    #[serde(default)]
    pub minimum_stay: Option<i32>,
    /// new earliest move-in date
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    /// new furnished flag
    #[serde(default)]
    pub is_furnished: Option<bool>,
    /// new bedroom count
    #[serde(default)]
    pub bedrooms: Option<i32>,
    /// new bathroom count
    #[serde(default)]
    pub bathrooms: Option<i32>,
    /// new location
    #[serde(default)]
    pub location: Option<LocationInput>,
    /// replacement photo set
    #[serde(default)]
    pub photo: Option<Vec<Photo>>,
    /// contact detail overrides
    #[serde(default)]
    pub contact_details: Option<ContactDetailsPatch>,
    /// take the listing on or off the market
    #[serde(default)]
    pub taken: Option<bool>,
}
