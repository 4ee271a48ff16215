//! Amenity endpoints. Reads are public; every write is admin-only.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::auth::TokenKeys;
use crate::facade::{authz, Facade, NewAmenity, UpdateAmenity};

use super::super::error::ApiError;
use super::require_auth;

#[utoipa::path(
    get,
    path = "/api/v1/amenities",
    responses(
        (status = 200, description = "All amenities", body = [crate::facade::AmenityView])
    ),
    tag = "amenities"
)]
pub async fn list(facade: Extension<Arc<Facade>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_all_amenities().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/amenities/{id}",
    responses(
        (status = 200, description = "Amenity detail", body = crate::facade::AmenityView),
        (status = 404, description = "Amenity not found"),
    ),
    tag = "amenities"
)]
pub async fn get(
    facade: Extension<Arc<Facade>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_amenity(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/amenities",
    request_body = NewAmenity,
    responses(
        (status = 201, description = "Amenity created", body = crate::facade::AmenityView),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required"),
        (status = 409, description = "Name already exists"),
    ),
    tag = "amenities"
)]
pub async fn create(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Json(payload): Json<NewAmenity>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    authz::require_admin(&principal.caller())?;
    let amenity = facade.create_amenity(payload).await?;
    Ok((StatusCode::CREATED, Json(amenity)))
}

#[utoipa::path(
    put,
    path = "/api/v1/amenities/{id}",
    request_body = UpdateAmenity,
    responses(
        (status = 200, description = "Amenity updated", body = crate::facade::AmenityView),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Amenity not found"),
        (status = 409, description = "Name already exists"),
    ),
    tag = "amenities"
)]
pub async fn update(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAmenity>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    authz::require_admin(&principal.caller())?;
    Ok(Json(facade.update_amenity(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/amenities/{id}",
    responses(
        (status = 204, description = "Amenity deleted and unlinked"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Amenity not found"),
    ),
    tag = "amenities"
)]
pub async fn delete(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    authz::require_admin(&principal.caller())?;
    facade.delete_amenity(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
