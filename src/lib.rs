//! # HBnB (Vacation-Rental Listing API)
//!
//! `hbnb` is a small CRUD service for vacation-rental listings: Users,
//! Amenities, Places, and Reviews, served over HTTP with JWT
//! authentication and role-based authorization.
//!
//! ## Layering
//!
//! - **Models** validate their own fields at construction and after every
//!   patch application.
//! - **Stores** are per-entity repositories with two interchangeable
//!   backends: in-memory (development, tests) and PostgreSQL.
//! - The **Facade** is the only writer to the stores. It owns every
//!   cross-entity rule: reference resolution, uniqueness checks, password
//!   hashing, explicit delete cascades, and composed read views.
//! - **Handlers** authenticate the caller, apply the authorization rules,
//!   call the facade, and map its errors to HTTP statuses.
//!
//! ## Authorization
//!
//! Access tokens embed the `is_admin` claim at issuance time and the claim
//! is trusted for the token's lifetime; revoking admin takes effect when
//! the token expires.

pub mod api;
pub mod auth;
pub mod cli;
pub mod facade;
pub mod models;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
