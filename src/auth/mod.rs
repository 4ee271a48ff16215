//! Authentication subsystem: password hashing and JWT issuance.
//!
//! Passwords are stored only as bcrypt hashes. Access tokens embed the
//! `is_admin` claim as it was at issuance time; the claim is trusted for
//! the token's lifetime and is not re-checked against the live user
//! record, so admin revocation takes effect at token expiry.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{AccessClaims, TokenError, TokenKeys, TokenKind, TokenPair};
