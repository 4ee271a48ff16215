//! Authenticated principal extraction.
//!
//! Flow overview: read the `Authorization: Bearer` header, verify the
//! access token, and return a principal downstream handlers authorize
//! against. The `is_admin` flag comes from the token claims, so it
//! reflects the user record at login time, not the current row.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::auth::{TokenError, TokenKeys};
use crate::facade::Caller;

use super::super::error::ApiError;

/// Authenticated user context derived from the access token.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Principal {
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.user_id,
            is_admin: self.is_admin,
        }
    }
}

/// Verify the bearer token, or return 401 for missing or bad tokens.
pub fn require_auth(headers: &HeaderMap, keys: &TokenKeys) -> Result<Principal, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Token(TokenError::Invalid))?;
    let claims = keys.verify_access(token)?;
    Ok(Principal {
        user_id: claims.sub,
        is_admin: claims.is_admin,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from("test-secret".to_string()), 900, 86400)
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = require_auth(&HeaderMap::new(), &keys()).expect_err("no header");
        assert!(matches!(err, ApiError::Token(TokenError::Invalid)));
    }

    #[test]
    fn valid_access_token_yields_principal() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let pair = keys.issue_pair(user_id, true).expect("issue");
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", pair.access_token).parse().expect("header"),
        );
        let principal = require_auth(&headers, &keys).expect("valid");
        assert_eq!(principal.user_id, user_id);
        assert!(principal.is_admin);
    }

    #[test]
    fn refresh_token_is_rejected() {
        let keys = keys();
        let pair = keys.issue_pair(Uuid::new_v4(), false).expect("issue");
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", pair.refresh_token)
                .parse()
                .expect("header"),
        );
        let err = require_auth(&headers, &keys).expect_err("wrong kind");
        assert!(matches!(err, ApiError::Token(TokenError::WrongKind)));
    }
}
