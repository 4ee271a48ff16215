//! Registration, login, and token refresh.
//!
//! Registration is public and always creates a regular account; the
//! admin flag can only be granted through the admin-only user endpoints.
//! Login verifies the password against the stored hash and issues an
//! access/refresh pair. Refresh re-reads the user record, so a refreshed
//! access token carries the current admin flag, not the one from login.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::{verify_password, TokenKeys};
use crate::facade::{Facade, NewUser};

use super::super::error::ApiError;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Refresh {
    pub refresh_token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = NewUser,
    responses(
        (status = 201, description = "Account created", body = crate::facade::UserView),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "auth"
)]
pub async fn register(
    facade: Extension<Arc<Facade>>,
    Json(mut payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    // Self-registration never grants admin.
    payload.is_admin = false;
    if facade.get_user_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::Conflict("Email"));
    }
    let user = facade.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = Login,
    responses(
        (status = 200, description = "Token pair issued"),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub async fn login(
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Json(payload): Json<Login>,
) -> Result<impl IntoResponse, ApiError> {
    let user = facade
        .get_user_by_email(&payload.email)
        .await?
        .ok_or(ApiError::BadCredentials)?;
    if !verify_password(&user.password_hash, &payload.password) {
        return Err(ApiError::BadCredentials);
    }
    let pair = keys.issue_pair(user.id, user.is_admin)?;
    Ok(Json(pair))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = Refresh,
    responses(
        (status = 200, description = "New token pair issued"),
        (status = 401, description = "Invalid or expired refresh token"),
    ),
    tag = "auth"
)]
pub async fn refresh(
    facade: Extension<Arc<Facade>>,
    keys: Extension<Arc<TokenKeys>>,
    Json(payload): Json<Refresh>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = keys.verify_refresh(&payload.refresh_token)?;
    // The admin flag is read from the live record here, unlike access
    // token verification which trusts the issued claim.
    let user = facade
        .get_user(claims.sub)
        .await
        .map_err(|_| ApiError::BadCredentials)?;
    let pair = keys.issue_pair(user.id, user.is_admin)?;
    Ok(Json(pair))
}
