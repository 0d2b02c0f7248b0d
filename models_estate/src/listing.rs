use chrono::{DateTime, Duration, Utc};
use estate_geo::GeoPoint;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pricing::Pricing;

/// Days after creation during which a listing counts as featured.
pub const FEATURED_WINDOW_DAYS: i64 = 7;

/// The property categories a listing can be filed under
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, Display,
)]
pub enum Category {
    /// an apartment unit
    Apartment,
    /// a standalone house
    House,
    /// a condominium
    Condo,
    /// a villa
    Villa,
    /// undeveloped land
    Land,
}

/// Whether a listing is offered for sale or for rent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListingType {
    /// offered for outright sale
    Sale,
    /// offered for rent
    Rent,
}

/// The billing cadence for rentals
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RentFrequency {
    /// billed per day
    Daily,
    /// billed per week
    Weekly,
    /// billed per month
    Monthly,
    /// billed per year
    Yearly,
}

/// Presence indicator carried on the owner profile join
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    /// user currently connected
    Online,
    /// user not connected
    Offline,
}

/// A single uploaded photo reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Photo {
    /// the blob store identifier, used for later removal
    pub id: String,
    /// the public url
    pub url: String,
}

/// Contact details denormalized onto the listing at create/update time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    /// reachable phone number
    pub phone_number: String,
    /// reachable email address
    pub email: String,
    /// street address
    pub address: String,
}

/// Partial contact details supplied on a request; present fields override
/// the owner's stored details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailsPatch {
    /// override phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// override email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// override address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactDetailsPatch {
    /// apply this patch over a complete base record
    pub fn merged_over(self, base: &ContactDetails) -> ContactDetails {
        ContactDetails {
            phone_number: self.phone_number.unwrap_or_else(|| base.phone_number.clone()),
            email: self.email.unwrap_or_else(|| base.email.clone()),
            address: self.address.unwrap_or_else(|| base.address.clone()),
        }
    }
}

/// A location value as clients actually send it: a plain point, a GeoJSON
/// point, or either of those wrapped in a JSON string. Normalized into a
/// [GeoPoint] exactly once at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LocationInput {
    /// `{ "longitude": .., "latitude": .. }`
    Point {
        /// degrees east
        longitude: f64,
        /// degrees north
        latitude: f64,
    },
    /// `{ "type": "Point", "coordinates": [lon, lat] }`
    GeoJson {
        /// longitude/latitude pair
        coordinates: [f64; 2],
    },
    /// one of the above, JSON-encoded into a string
    Text(String),
}

/// failure to turn a [LocationInput] into a valid point
#[derive(Debug, Error)]
pub enum LocationParseError {
    /// the embedded string was not valid JSON for a location
    #[error("invalid location format")]
    Malformed,
    /// the coordinates were out of range or non-finite
    #[error("coordinates out of range")]
    OutOfRange,
}

impl LocationInput {
    /// normalize into a validated [GeoPoint]
    pub fn into_point(self) -> Result<GeoPoint, LocationParseError> {
        let point = match self {
            LocationInput::Point {
                longitude,
                latitude,
            } => GeoPoint::new(longitude, latitude),
            LocationInput::GeoJson { coordinates } => {
                GeoPoint::new(coordinates[0], coordinates[1])
            }
            LocationInput::Text(raw) => {
                let inner: LocationInput =
                    serde_json::from_str(&raw).map_err(|_| LocationParseError::Malformed)?;
                // a string containing another string is not worth chasing
                if matches!(inner, LocationInput::Text(_)) {
                    return Err(LocationParseError::Malformed);
                }
                return inner.into_point();
            }
        };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(LocationParseError::OutOfRange)
        }
    }
}

/// A property advertisement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// listing identifier
    pub id: Uuid,
    /// the owning user
    pub user_id: Uuid,
    /// short headline, 5 to 100 characters
    pub title: String,
    /// full description, 10 to 1000 characters
    pub description: String,
    /// property category
    pub category: Category,
    /// sale or rental pricing; exactly one shape is populated
    #[serde(flatten)]
    pub pricing: Pricing,
    /// earliest move-in date, when advertised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_from: Option<DateTime<Utc>>,
    /// whether the property is furnished, when advertised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_furnished: Option<bool>,
    /// bedroom count
    pub bedrooms: i32,
    /// bathroom count
    pub bathrooms: i32,
    /// where the property is
    pub location: GeoPoint,
    /// ordered photo references
    pub photo: Vec<Photo>,
    /// denormalized owner contact info
    pub contact_details: ContactDetails,
    /// whether the property has been taken off the market
    pub taken: bool,
    /// derived: true while the listing is inside the featured window
    pub featured: bool,
    /// aggregate review rating
    pub average_rating: f64,
    /// number of reviews
    pub num_of_reviews: i32,
    /// distinct-viewer count
    pub views_count: i64,
    /// users who have viewed this listing, for idempotent counting
    pub viewed_by: Vec<Uuid>,
    /// like count; always equals the cardinality of `liked_by`
    pub like_count: i64,
    /// users who currently like this listing
    pub liked_by: Vec<Uuid>,
    /// creation time
    pub created_at: DateTime<Utc>,
    /// last mutation time
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// whether this listing counts as featured at `now`
    pub fn is_featured_at(&self, now: DateTime<Utc>) -> bool {
        now < self.created_at + Duration::days(FEATURED_WINDOW_DAYS)
    }

    /// recompute the derived featured flag, done on every read path
    pub fn refresh_featured(&mut self, now: DateTime<Utc>) {
        self.featured = self.is_featured_at(now);
    }
}

/// Minimal owner profile joined onto listings returned by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    /// the owner's user id
    pub id: Uuid,
    /// display name
    pub username: String,
    /// avatar url, when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// contact email
    pub email: String,
    /// presence status
    pub status: UserStatus,
    /// last time the owner was seen online
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

/// A listing together with its joined owner profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListingWithOwner {
    /// the listing itself
    #[serde(flatten)]
    pub listing: Listing,
    /// the owner profile subset
    pub user: OwnerProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::Pricing;

    fn sample_listing(created_at: DateTime<Utc>) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Two bed apartment".into(),
            description: "Bright two bed close to town".into(),
            category: Category::Apartment,
            pricing: Pricing::Sale { price: 150_000.0 },
            available_from: None,
            is_furnished: None,
            bedrooms: 2,
            bathrooms: 1,
            location: GeoPoint::new(0.0, 0.0),
            photo: vec![],
            contact_details: ContactDetails {
                phone_number: "123".into(),
                email: "a@b.c".into(),
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
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn featured_window_is_seven_days() {
        let now = Utc::now();
        let mut fresh = sample_listing(now - Duration::days(6));
        fresh.refresh_featured(now);
        assert!(fresh.featured);

        let mut stale = sample_listing(now - Duration::days(8));
        stale.refresh_featured(now);
        assert!(!stale.featured);
    }

    #[test]
    fn listing_serializes_flat_pricing() {
        let listing = sample_listing(Utc::now());
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["listingType"], "sale");
        assert_eq!(value["price"], 150_000.0);
        assert!(value.get("rentPrice").is_none());
    }

    #[test]
    fn location_input_normalizes_all_shapes() {
        let p = LocationInput::Point {
            longitude: 1.0,
            latitude: 2.0,
        };
        assert_eq!(p.into_point().unwrap(), GeoPoint::new(1.0, 2.0));

        let g = LocationInput::GeoJson {
            coordinates: [3.0, 4.0],
        };
        assert_eq!(g.into_point().unwrap(), GeoPoint::new(3.0, 4.0));

        let t = LocationInput::Text(r#"{"type":"Point","coordinates":[5.0,6.0]}"#.into());
        assert_eq!(t.into_point().unwrap(), GeoPoint::new(5.0, 6.0));

        assert!(
            LocationInput::Text("[object Object]".into())
                .into_point()
                .is_err()
        );
        assert!(
            LocationInput::GeoJson {
                coordinates: [500.0, 0.0]
            }
            .into_point()
            .is_err()
        );
    }

    #[test]
    fn contact_patch_merges_over_base() {
        let base = ContactDetails {
            phone_number: "123".into(),
            email: "owner@example.com".into(),
            address: "1 Main St".into(),
        };
        let patch = ContactDetailsPatch {
            phone_number: Some("456".into()),
            ..Default::default()
        };
        let merged = patch.merged_over(&base);
        assert_eq!(merged.phone_number, "456");
        assert_eq!(merged.email, "owner@example.com");
        assert_eq!(merged.address, "1 Main St");
    }
}
