//! Place endpoints, including the nested review and amenity-link routes.
//!
//! Reads are public. Creation requires authentication; a non-admin
//! caller always becomes the owner, regardless of any `owner_id` in the
//! payload. Updates, deletion, and amenity linking require the place's
//! owner or an admin.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::auth::TokenKeys;
use crate::facade::{authz, Facade, NewPlace, NewReview, UpdatePlace};

use super::super::error::ApiError;
use super::require_auth;

#[utoipa::path(
    get,
    path = "/api/v1/places",
    responses(
        (status = 200, description = "Place summaries", body = [crate::facade::PlaceSummary])
    ),
    tag = "places"
)]
pub async fn list(facade: Extension<Arc<Facade>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_all_places().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{id}",
    responses(
        (status = 200, description = "Composed place detail", body = crate::facade::PlaceDetail),
        (status = 404, description = "Place not found"),
    ),
    tag = "places"
)]
pub async fn get(
    facade: Extension<Arc<Facade>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_place(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/places",
    request_body = NewPlace,
    responses(
        (status = 201, description = "Place created", body = crate::facade::PlaceDetail),
        (status = 400, description = "Invalid input or unresolvable reference"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "places"
)]
pub async fn create(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Json(mut payload): Json<NewPlace>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    // Admins may create on behalf of another owner; everyone else owns
    // what they create.
    if principal.is_admin {
        payload.owner_id = payload.owner_id.or(Some(principal.user_id));
    } else {
        payload.owner_id = Some(principal.user_id);
    }
    let place = facade.create_place(payload).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

#[utoipa::path(
    put,
    path = "/api/v1/places/{id}",
    request_body = UpdatePlace,
    responses(
        (status = 200, description = "Place updated", body = crate::facade::PlaceDetail),
        (status = 400, description = "Invalid input or unresolvable reference"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Place not found"),
    ),
    tag = "places"
)]
pub async fn update(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlace>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    let owner_id = facade.place_owner(id).await?;
    authz::require_owner_or_admin(&principal.caller(), owner_id)?;
    Ok(Json(facade.update_place(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/places/{id}",
    responses(
        (status = 204, description = "Place and its reviews deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Place not found"),
    ),
    tag = "places"
)]
pub async fn delete(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    let owner_id = facade.place_owner(id).await?;
    authz::require_owner_or_admin(&principal.caller(), owner_id)?;
    facade.delete_place(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{id}/reviews",
    responses(
        (status = 200, description = "Reviews of the place", body = [crate::facade::ReviewView]),
        (status = 404, description = "Place not found"),
    ),
    tag = "places"
)]
pub async fn list_reviews(
    facade: Extension<Arc<Facade>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_reviews_by_place(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/places/{id}/reviews",
    request_body = NewReview,
    responses(
        (status = 201, description = "Review created", body = crate::facade::ReviewView),
        (status = 400, description = "Invalid input or unresolvable reference"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "places"
)]
pub async fn create_review(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<NewReview>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    // The reviewer is always the caller; the place comes from the path.
    payload.user_id = Some(principal.user_id);
    payload.place_id = Some(id);
    let review = facade.create_review(payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{id}/amenities",
    responses(
        (status = 200, description = "Amenities linked to the place", body = [crate::facade::AmenityRef]),
        (status = 404, description = "Place not found"),
    ),
    tag = "places"
)]
pub async fn list_amenities(
    facade: Extension<Arc<Facade>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_amenities_by_place(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/places/{id}/amenities/{amenity_id}",
    responses(
        (status = 200, description = "Amenity linked (no-op when already linked)", body = crate::facade::PlaceDetail),
        (status = 400, description = "Amenity does not exist"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Place not found"),
    ),
    tag = "places"
)]
pub async fn link_amenity(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path((id, amenity_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    let owner_id = facade.place_owner(id).await?;
    authz::require_owner_or_admin(&principal.caller(), owner_id)?;
    Ok(Json(facade.add_amenity_to_place(id, amenity_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/places/{id}/amenities/{amenity_id}",
    responses(
        (status = 204, description = "Amenity unlinked"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Place or link not found"),
    ),
    tag = "places"
)]
pub async fn unlink_amenity(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path((id, amenity_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    let owner_id = facade.place_owner(id).await?;
    authz::require_owner_or_admin(&principal.caller(), owner_id)?;
    facade.remove_amenity_from_place(id, amenity_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
