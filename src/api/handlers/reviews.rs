//! Flat review endpoints.
//!
//! Creation requires authentication; a non-admin caller is always the
//! review's author. Update and delete require authentication only, with
//! no ownership check. That looser rule matches the documented behavior
//! of the service this replaces and has been flagged to the product
//! owner rather than silently tightened.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::auth::TokenKeys;
use crate::facade::{Facade, NewReview, UpdateReview};

use super::super::error::ApiError;
use super::require_auth;

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "All reviews", body = [crate::facade::ReviewView])
    ),
    tag = "reviews"
)]
pub async fn list(facade: Extension<Arc<Facade>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_all_reviews().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    responses(
        (status = 200, description = "Review detail", body = crate::facade::ReviewView),
        (status = 404, description = "Review not found"),
    ),
    tag = "reviews"
)]
pub async fn get(
    facade: Extension<Arc<Facade>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_review(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = NewReview,
    responses(
        (status = 201, description = "Review created", body = crate::facade::ReviewView),
        (status = 400, description = "Invalid input or unresolvable reference"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "reviews"
)]
pub async fn create(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Json(mut payload): Json<NewReview>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    // Admins may file a review for another user; everyone else reviews
    // as themselves.
    if principal.is_admin {
        payload.user_id = payload.user_id.or(Some(principal.user_id));
    } else {
        payload.user_id = Some(principal.user_id);
    }
    let review = facade.create_review(payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = crate::facade::ReviewView),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Review not found"),
    ),
    tag = "reviews"
)]
pub async fn update(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReview>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&headers, &keys)?;
    Ok(Json(facade.update_review(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Review not found"),
    ),
    tag = "reviews"
)]
pub async fn delete(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_auth(&headers, &keys)?;
    facade.delete_review(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
