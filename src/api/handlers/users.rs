//! User endpoints.
//!
//! Creation and deletion are admin-only; reads and updates of a single
//! user are allowed for the subject user or an admin. Non-admins cannot
//! change their own email, password, or admin flag through the update
//! endpoint.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::auth::TokenKeys;
use crate::facade::{authz, Facade, NewUser, UpdateUser};

use super::super::error::ApiError;
use super::require_auth;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = [crate::facade::UserView])
    ),
    tag = "users"
)]
pub async fn list(facade: Extension<Arc<Facade>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(facade.get_all_users().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = crate::facade::UserView),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn create(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    authz::require_admin(&principal.caller())?;
    if facade.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict("Email"));
    }
    let user = facade.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    responses(
        (status = 200, description = "User detail", body = crate::facade::UserView),
        (status = 403, description = "Not the subject user"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    authz::require_self_or_admin(&principal.caller(), id)?;
    Ok(Json(facade.get_user(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = crate::facade::UserView),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Restricted field or not the subject user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn update(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    let caller = principal.caller();
    authz::require_self_or_admin(&caller, id)?;
    authz::check_user_patch(&caller, &payload)?;
    Ok(Json(facade.update_user(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    responses(
        (status = 204, description = "User and owned entities deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete(
    headers: HeaderMap,
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = require_auth(&headers, &keys)?;
    authz::require_admin(&principal.caller())?;
    facade.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
