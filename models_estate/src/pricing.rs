use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::listing::{ListingType, RentFrequency};

/// Pricing for a listing.
///
/// Exactly one shape is populated and it always matches the listing type,
/// by construction: the old schema's field-by-field conditional
/// requiredness is replaced by this union plus [Pricing::from_parts].
///
/// Serializes flat onto the listing, with the variant recorded under
/// `listingType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "listingType", rename_all_fields = "camelCase")]
pub enum Pricing {
    /// a sale listing with an asking price
    #[serde(rename = "sale")]
    Sale {
        /// asking price, must be positive
        price: f64,
    },
    /// a rental listing
    #[serde(rename = "rent")]
    Rental {
        /// rent amount per billing period, must be positive
        rent_price: f64,
        /// billing cadence
        rent_frequency: RentFrequency,
        /// optional upfront deposit
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deposit_amount: Option<f64>,
        /// optional minimum stay in billing periods
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum_stay: Option<i32>,
    },
}

/// why a pricing shape could not be constructed
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// sale listing without a price
    #[error("a sale listing requires a price")]
    MissingPrice,
    /// rent listing without a rent price
    #[error("a rent listing requires a rent price")]
    MissingRentPrice,
    /// rent listing without a frequency
    #[error("a rent listing requires a rent frequency")]
    MissingRentFrequency,
    /// a price or rent price that is not a positive finite number
    #[error("prices must be positive numbers")]
    NonPositivePrice,
    /// deposit below zero
    #[error("deposit amount cannot be negative")]
    NegativeDeposit,
    /// minimum stay below one period
    #[error("minimum stay must be at least 1")]
    InvalidMinimumStay,
}

impl Pricing {
    /// The single validating constructor: builds the shape matching
    /// `listing_type` from loosely supplied parts, rejecting anything
    /// incomplete or out of range.
    pub fn from_parts(
        listing_type: ListingType,
        price: Option<f64>,
        rent_price: Option<f64>,
        rent_frequency: Option<RentFrequency>,
        deposit_amount: Option<f64>,
        minimum_stay: Option<i32>,
    ) -> Result<Self, PricingError> {
        match listing_type {
            ListingType::Sale => {
                let price = price.ok_or(PricingError::MissingPrice)?;
                if !price.is_finite() || price <= 0.0 {
                    return Err(PricingError::NonPositivePrice);
                }
                Ok(Pricing::Sale { price })
            }
            ListingType::Rent => {
                let rent_price = rent_price.ok_or(PricingError::MissingRentPrice)?;
                if !rent_price.is_finite() || rent_price <= 0.0 {
                    return Err(PricingError::NonPositivePrice);
                }
                let rent_frequency = rent_frequency.ok_or(PricingError::MissingRentFrequency)?;
                if deposit_amount.is_some_and(|d| !d.is_finite() || d < 0.0) {
                    return Err(PricingError::NegativeDeposit);
                }
                if minimum_stay.is_some_and(|m| m < 1) {
                    return Err(PricingError::InvalidMinimumStay);
                }
                Ok(Pricing::Rental {
                    rent_price,
                    rent_frequency,
                    deposit_amount,
                    minimum_stay,
                })
            }
        }
    }

    /// which listing type this pricing belongs to
    pub fn listing_type(&self) -> ListingType {
        match self {
            Pricing::Sale { .. } => ListingType::Sale,
            Pricing::Rental { .. } => ListingType::Rent,
        }
    }

    /// the comparable amount: price for sales, rent price for rentals
    pub fn amount(&self) -> f64 {
        match self {
            Pricing::Sale { price } => *price,
            Pricing::Rental { rent_price, .. } => *rent_price,
        }
    }
}
