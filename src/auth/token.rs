//! JWT issuance and validation (HS256).
//!
//! Login issues a pair: an access token carrying the `is_admin` claim and
//! a refresh token carrying only the subject. Verification checks the
//! signature, the expiry, and the token kind, so a refresh token cannot be
//! replayed against endpoints that expect an access token.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    /// Signature, structure, or claim decoding failure.
    Invalid,
    /// Valid token of the wrong kind (e.g. refresh where access expected).
    WrongKind,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "token has expired"),
            Self::Invalid => write!(f, "invalid token"),
            Self::WrongKind => write!(f, "wrong token kind"),
        }
    }
}

impl std::error::Error for TokenError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub is_admin: bool,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing and verification keys plus token lifetimes.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &SecretString, access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: Duration::seconds(access_ttl_seconds.min(i64::MAX as u64) as i64),
            refresh_ttl: Duration::seconds(refresh_ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }

    /// Issue an access/refresh pair for a user.
    ///
    /// # Errors
    /// Returns error if token signing fails.
    pub fn issue_pair(&self, user_id: Uuid, is_admin: bool) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, is_admin, TokenKind::Access, self.access_ttl)?,
            // Refresh tokens never carry the admin claim; it is re-read at refresh time.
            refresh_token: self.issue(user_id, false, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    fn issue(
        &self,
        user_id: Uuid,
        is_admin: bool,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id,
            is_admin,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    /// Verify a bearer token and require it to be an access token.
    ///
    /// # Errors
    /// Returns `Expired`, `Invalid`, or `WrongKind`.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Access {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }

    /// Verify a bearer token and require it to be a refresh token.
    ///
    /// # Errors
    /// Returns `Expired`, `Invalid`, or `WrongKind`.
    pub fn verify_refresh(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(&SecretString::from("test-secret".to_string()), 900, 86400)
    }

    #[test]
    fn access_token_round_trips_claims() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let pair = keys.issue_pair(user_id, true).expect("issue");

        let claims = keys.verify_access(&pair.access_token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert!(claims.is_admin);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_is_rejected_as_access() {
        let keys = keys();
        let pair = keys.issue_pair(Uuid::new_v4(), true).expect("issue");

        let err = keys
            .verify_access(&pair.refresh_token)
            .expect_err("refresh must not pass as access");
        assert_eq!(err, TokenError::WrongKind);

        let claims = keys.verify_refresh(&pair.refresh_token).expect("verify");
        // Admin status is never trusted from a refresh token.
        assert!(!claims.is_admin);
    }

    #[test]
    fn garbage_is_invalid() {
        let err = keys()
            .verify_access("not.a.token")
            .expect_err("garbage must fail");
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let pair = keys().issue_pair(Uuid::new_v4(), false).expect("issue");
        let other = TokenKeys::new(&SecretString::from("other-secret".to_string()), 900, 86400);
        let err = other
            .verify_access(&pair.access_token)
            .expect_err("wrong key must fail");
        assert_eq!(err, TokenError::Invalid);
    }
}
