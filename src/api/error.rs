//! Error-to-response mapping for the HTTP layer.
//!
//! Validation and reference failures are 400s, missing primary entities
//! are 404s, uniqueness collisions are 409s, authentication problems are
//! 401s, and authorization denials are 403s. Backend faults are logged
//! with the request span and surfaced as a bare 500; their details never
//! reach a client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use crate::auth::TokenError;
use crate::facade::{AuthzError, FacadeError};

#[derive(Debug)]
pub enum ApiError {
    Facade(FacadeError),
    Authz(AuthzError),
    /// Missing, malformed, expired, or wrong-kind bearer token.
    Token(TokenError),
    /// Login with an unknown email or a wrong password.
    BadCredentials,
    /// Duplicate detected by a handler-level lookup before creation.
    Conflict(&'static str),
}

impl From<FacadeError> for ApiError {
    fn from(err: FacadeError) -> Self {
        Self::Facade(err)
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        Self::Authz(err)
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Facade(err) => match &err {
                FacadeError::Validation(_) | FacadeError::Reference { .. } => {
                    error_body(StatusCode::BAD_REQUEST, &err.to_string())
                }
                FacadeError::NotFound(_) => error_body(StatusCode::NOT_FOUND, &err.to_string()),
                FacadeError::Conflict(_) => error_body(StatusCode::CONFLICT, &err.to_string()),
                FacadeError::Store(_) | FacadeError::PasswordHash(_) => {
                    error!("Failed to handle request: {err}");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
            Self::Authz(err) => error_body(StatusCode::FORBIDDEN, &err.to_string()),
            Self::Token(err) => error_body(StatusCode::UNAUTHORIZED, &err.to_string()),
            Self::BadCredentials => {
                error_body(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            Self::Conflict(what) => {
                error_body(StatusCode::CONFLICT, &format!("{what} already exists"))
            }
        }
    }
}
