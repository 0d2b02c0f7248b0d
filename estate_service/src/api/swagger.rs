use utoipa::OpenApi;

use crate::api::{estate, health};

use estate_geo::GeoPoint;
use models_estate::listing::{
    Category, ContactDetails, ContactDetailsPatch, Listing, ListingType, ListingWithOwner,
    LocationInput, OwnerProfile, Photo, RentFrequency, UserStatus,
};
use models_estate::pricing::Pricing;
use models_estate::request::{CreateListingRequest, UpdateListingRequest};
use models_estate::response::{
    AdResponse, BrowsePageResponse, ErrorResponse, LikeToggleResponse, MessageResponse,
    SearchPageResponse, ViewCountResponse,
};

#[derive(OpenApi)]
#[openapi(
        paths(
                /// /health
                health::health_handler,

                /// /estate search
                estate::nearby::handler,
                estate::rent::handler,
                estate::search::handler,
                estate::browse::handler,
                estate::user_ads::handler,

                /// /estate crud
                estate::get_ad::handler,
                estate::create::handler,
                estate::update::handler,
                estate::delete_ad::handler,
                estate::mark_taken::handler,

                /// /estate engagement
                estate::view::handler,
                estate::like::handler,
        ),
        components(
            schemas(
                        ErrorResponse,
                        MessageResponse,

                        // Listing
                        GeoPoint, Category, ListingType, RentFrequency, UserStatus, Photo,
                        ContactDetails, ContactDetailsPatch, LocationInput, Pricing,
                        Listing, OwnerProfile, ListingWithOwner,

                        // Requests
                        CreateListingRequest, UpdateListingRequest,

                        // Responses
                        SearchPageResponse, BrowsePageResponse, AdResponse,
                        ViewCountResponse, LikeToggleResponse
                ),
        ),
        tags(
            (name = "estate service", description = "Estate Marketplace Service")
        )
    )]
pub struct ApiDoc;
