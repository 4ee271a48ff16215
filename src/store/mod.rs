//! Per-entity repository traits shared by both storage backends.
//!
//! `get` returns `Ok(None)` for a missing id, never an error; the facade
//! decides whether that is a 404 (primary entity) or a 400 (dangling
//! reference). `update` takes a fully mutated entity: the facade reads,
//! applies a typed patch, re-validates, and writes the result back, so the
//! stores never merge untyped field maps. Like `get`, `update` answers
//! `Ok(None)` when the id is absent; it never inserts.

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Amenity, Place, Review, User};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAmenityStore, MemoryPlaceStore, MemoryReviewStore, MemoryUserStore};
pub use postgres::{PgAmenityStore, PgPlaceStore, PgReviewStore, PgUserStore};

#[derive(Debug)]
pub enum StoreError {
    /// A storage-level uniqueness constraint was violated (email, name).
    Conflict(&'static str),
    /// Backend fault; logged server-side, never shown to clients.
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(what) => write!(f, "{what} already exists"),
            Self::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

/// SQLSTATE 23505, raised by the relational backend on unique violations.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add(&self, user: User) -> Result<User, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn get_all(&self) -> Result<Vec<User>, StoreError>;
    async fn update(&self, user: User) -> Result<Option<User>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait AmenityStore: Send + Sync {
    async fn add(&self, amenity: Amenity) -> Result<Amenity, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Amenity>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Amenity>, StoreError>;
    async fn update(&self, amenity: Amenity) -> Result<Option<Amenity>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn get_by_name(&self, name: &str) -> Result<Option<Amenity>, StoreError>;
}

#[async_trait]
pub trait PlaceStore: Send + Sync {
    async fn add(&self, place: Place) -> Result<Place, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Place>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Place>, StoreError>;
    async fn update(&self, place: Place) -> Result<Option<Place>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Place>, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn add(&self, review: Review) -> Result<Review, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<Review>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Review>, StoreError>;
    async fn update(&self, review: Review) -> Result<Option<Review>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn get_by_place(&self, place_id: Uuid) -> Result<Vec<Review>, StoreError>;
    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, StoreError>;
}
