//! Domain and API models for the estate marketplace.
//!
//! The listing model and its enums live in [listing]; the conditionally
//! required price fields of the old schema are replaced by the [Pricing]
//! tagged union with a single exhaustive constructor.

pub mod listing;
pub mod pricing;
pub mod request;
pub mod response;
pub mod sort;
pub mod user;

pub use listing::{
    Category, ContactDetails, ContactDetailsPatch, Listing, ListingType, ListingWithOwner,
    LocationInput, OwnerProfile, Photo, RentFrequency, UserStatus,
};
pub use pricing::{Pricing, PricingError};
pub use sort::SortOption;
pub use user::UserContext;
