//! Response bodies for the listing endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::listing::ListingWithOwner;

/// A plain json error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse<'a> {
    /// message to explain failure
    pub message: &'a str,
}

/// Page of listings returned by the nearby/rent/search endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPageResponse {
    /// the page of listings
    pub ads: Vec<ListingWithOwner>,
    /// total matches for the active dataset
    pub total: i64,
    /// ceil(total / limit)
    pub num_of_pages: i64,
    /// the echoed page number
    pub page: i64,
    /// true when the page came from the geo-nearby dataset
    pub is_nearby_data: bool,
    /// true when more nearby pages exist beyond this one
    pub has_more_nearby: bool,
}

/// Page of listings returned by the legacy browse and user-ads endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePageResponse {
    /// total matches
    pub total_ads: i64,
    /// ceil(total / limit)
    pub num_of_pages: i64,
    /// the page of listings
    pub ads: Vec<ListingWithOwner>,
    /// the echoed page number
    pub page: i64,
}

/// A single listing with its owner join.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdResponse {
    /// the listing
    pub ad: ListingWithOwner,
}

/// Confirmation message, used by delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// human readable confirmation
    pub msg: String,
}

/// Current distinct-viewer count for a listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewCountResponse {
    /// the view count after this request
    pub views_count: i64,
}

/// Result of a like toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    /// whether the requester likes the listing after this toggle
    pub liked: bool,
    /// the like count after this toggle
    pub like_count: i64,
}
