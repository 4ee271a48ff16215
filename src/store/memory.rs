//! In-memory storage backend.
//!
//! Rows live in a `tokio::sync::RwLock<Vec<_>>` per entity type, which
//! keeps `get_all` in insertion order and serializes concurrent mutation
//! (the lock is held only for the duration of one store call). Intended
//! for development and tests; production deployments pass `--dsn` and get
//! the relational backend instead.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Amenity, Place, Review, User};

use super::{AmenityStore, PlaceStore, ReviewStore, StoreError, UserStore};

/// Keyed rows behind a lock; `update` is a replace-by-id and answers
/// `None` for an absent id rather than inserting.
struct Table<T> {
    rows: RwLock<Vec<T>>,
    id_of: fn(&T) -> Uuid,
}

impl<T: Clone> Table<T> {
    fn new(id_of: fn(&T) -> Uuid) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            id_of,
        }
    }

    async fn add(&self, row: T) -> T {
        self.rows.write().await.push(row.clone());
        row
    }

    async fn get(&self, id: Uuid) -> Option<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| (self.id_of)(row) == id)
            .cloned()
    }

    async fn get_all(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    async fn replace(&self, row: T) -> Option<T> {
        let mut rows = self.rows.write().await;
        let id = (self.id_of)(&row);
        let slot = rows.iter_mut().find(|candidate| (self.id_of)(candidate) == id)?;
        *slot = row.clone();
        Some(row)
    }

    async fn delete(&self, id: Uuid) -> bool {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| (self.id_of)(row) != id);
        rows.len() != before
    }

    async fn find<P: Fn(&T) -> bool>(&self, predicate: P) -> Option<T> {
        self.rows.read().await.iter().find(|row| predicate(row)).cloned()
    }

    async fn filter<P: Fn(&T) -> bool>(&self, predicate: P) -> Vec<T> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

pub struct MemoryUserStore {
    table: Table<User>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(|user| user.id),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn add(&self, user: User) -> Result<User, StoreError> {
        Ok(self.table.add(user).await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.table.get_all().await)
    }

    async fn update(&self, user: User) -> Result<Option<User>, StoreError> {
        Ok(self.table.replace(user).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.table.delete(id).await)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.table.find(|user| user.email == email).await)
    }
}

pub struct MemoryAmenityStore {
    table: Table<Amenity>,
}

impl MemoryAmenityStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(|amenity| amenity.id),
        }
    }
}

impl Default for MemoryAmenityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AmenityStore for MemoryAmenityStore {
    async fn add(&self, amenity: Amenity) -> Result<Amenity, StoreError> {
        Ok(self.table.add(amenity).await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Amenity>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Amenity>, StoreError> {
        Ok(self.table.get_all().await)
    }

    async fn update(&self, amenity: Amenity) -> Result<Option<Amenity>, StoreError> {
        Ok(self.table.replace(amenity).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.table.delete(id).await)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Amenity>, StoreError> {
        Ok(self.table.find(|amenity| amenity.name == name).await)
    }
}

pub struct MemoryPlaceStore {
    table: Table<Place>,
}

impl MemoryPlaceStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(|place| place.id),
        }
    }
}

impl Default for MemoryPlaceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaceStore for MemoryPlaceStore {
    async fn add(&self, place: Place) -> Result<Place, StoreError> {
        Ok(self.table.add(place).await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Place>, StoreError> {
        Ok(self.table.get_all().await)
    }

    async fn update(&self, place: Place) -> Result<Option<Place>, StoreError> {
        Ok(self.table.replace(place).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.table.delete(id).await)
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Place>, StoreError> {
        Ok(self.table.filter(|place| place.owner_id == owner_id).await)
    }
}

pub struct MemoryReviewStore {
    table: Table<Review>,
}

impl MemoryReviewStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(|review| review.id),
        }
    }
}

impl Default for MemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn add(&self, review: Review) -> Result<Review, StoreError> {
        Ok(self.table.add(review).await)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        Ok(self.table.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Review>, StoreError> {
        Ok(self.table.get_all().await)
    }

    async fn update(&self, review: Review) -> Result<Option<Review>, StoreError> {
        Ok(self.table.replace(review).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.table.delete(id).await)
    }

    async fn get_by_place(&self, place_id: Uuid) -> Result<Vec<Review>, StoreError> {
        Ok(self.table.filter(|review| review.place_id == place_id).await)
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, StoreError> {
        Ok(self.table.filter(|review| review.user_id == user_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new(
            "John".to_string(),
            "Doe".to_string(),
            email.to_string(),
            "hash".to_string(),
            false,
        )
        .expect("valid user")
    }

    #[tokio::test]
    async fn get_all_preserves_insertion_order() {
        let store = MemoryUserStore::new();
        let first = store.add(user("a@example.com")).await.expect("add");
        let second = store.add(user("b@example.com")).await.expect("add");

        let all = store.get_all().await.expect("get_all");
        assert_eq!(
            all.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[tokio::test]
    async fn get_by_email_finds_first_match() {
        let store = MemoryUserStore::new();
        let stored = store.add(user("a@example.com")).await.expect("add");
        let found = store
            .get_by_email("a@example.com")
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found.id, stored.id);
        assert!(store
            .get_by_email("missing@example.com")
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = MemoryUserStore::new();
        let stored = store.add(user("a@example.com")).await.expect("add");
        assert!(store.delete(stored.id).await.expect("delete"));
        assert!(!store.delete(stored.id).await.expect("delete"));
        assert!(store.get(stored.id).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn update_replaces_by_id() {
        let store = MemoryUserStore::new();
        let mut stored = store.add(user("a@example.com")).await.expect("add");
        stored.first_name = "Jane".to_string();
        let updated = store.update(stored.clone()).await.expect("update");
        assert!(updated.is_some());
        let fetched = store.get(stored.id).await.expect("get").expect("present");
        assert_eq!(fetched.first_name, "Jane");
        assert_eq!(store.get_all().await.expect("get_all").len(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_id_does_not_insert() {
        let store = MemoryUserStore::new();
        let never_added = user("ghost@example.com");
        let updated = store.update(never_added).await.expect("update");
        assert!(updated.is_none());
        assert!(store.get_all().await.expect("get_all").is_empty());
    }
}
