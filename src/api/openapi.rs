//! OpenAPI document for the listing API, served through Swagger UI at
//! `/docs`. Add new endpoints to `paths(...)` so they stay documented.

use utoipa::OpenApi;

use super::handlers::{amenities, auth, health, places, reviews, users};
use crate::facade::{
    AmenityRef, AmenityView, NewAmenity, NewPlace, NewReview, NewUser, OwnerRef, PlaceDetail,
    PlaceReview, PlaceSummary, ReviewView, UpdateAmenity, UpdatePlace, UpdateReview, UpdateUser,
    UserView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::refresh,
        users::list,
        users::create,
        users::get,
        users::update,
        users::delete,
        amenities::list,
        amenities::get,
        amenities::create,
        amenities::update,
        amenities::delete,
        places::list,
        places::get,
        places::create,
        places::update,
        places::delete,
        places::list_reviews,
        places::create_review,
        places::list_amenities,
        places::link_amenity,
        places::unlink_amenity,
        reviews::list,
        reviews::get,
        reviews::create,
        reviews::update,
        reviews::delete,
    ),
    components(schemas(
        health::Health,
        auth::Login,
        auth::Refresh,
        NewUser,
        UpdateUser,
        UserView,
        NewAmenity,
        UpdateAmenity,
        AmenityView,
        AmenityRef,
        NewPlace,
        UpdatePlace,
        PlaceSummary,
        PlaceDetail,
        PlaceReview,
        OwnerRef,
        NewReview,
        UpdateReview,
        ReviewView,
    )),
    tags(
        (name = "hbnb", description = "Vacation-rental listing API")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
