//! The orchestration core.
//!
//! Every cross-entity rule lives here: reference resolution before any
//! write, uniqueness checks, password hashing, explicit delete cascades,
//! and the composed read views for places. Handlers never touch a store
//! directly; the facade is the sole writer.
//!
//! Guard checks run before the first store lookup, so malformed input can
//! never leave a partial write behind. Multi-write cascades delete
//! children first, so an interrupted cascade never leaves a dangling
//! child row.

use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::models::{
    Amenity, AmenityPatch, Place, PlacePatch, Review, ReviewPatch, User, UserPatch,
    ValidationError,
};
use crate::store::{
    AmenityStore, MemoryAmenityStore, MemoryPlaceStore, MemoryReviewStore, MemoryUserStore,
    PgAmenityStore, PgPlaceStore, PgReviewStore, PgUserStore, PlaceStore, ReviewStore, StoreError,
    UserStore,
};

pub mod authz;
pub mod guards;
pub mod types;

pub use authz::{AuthzError, Caller};
pub use types::{
    AmenityRef, AmenityView, NewAmenity, NewPlace, NewReview, NewUser, OwnerRef, PlaceDetail,
    PlaceReview, PlaceSummary, ReviewView, UpdateAmenity, UpdatePlace, UpdateReview, UpdateUser,
    UserView,
};

#[derive(Debug)]
pub enum FacadeError {
    /// Malformed or out-of-range input.
    Validation(ValidationError),
    /// A referenced id (owner, amenity, user, place) did not resolve.
    /// Client error: the reference is bad input, not a missing resource.
    Reference { entity: &'static str, id: Uuid },
    /// The primary entity targeted by get/update/delete does not exist.
    NotFound(&'static str),
    /// A uniqueness rule was violated (email, amenity name).
    Conflict(&'static str),
    /// Backend fault; logged server-side, never shown to clients.
    Store(StoreError),
    /// Password hashing backend failure.
    PasswordHash(anyhow::Error),
}

impl fmt::Display for FacadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => err.fmt(f),
            Self::Reference { entity, id } => write!(f, "{entity} {id} does not exist"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Conflict(what) => write!(f, "{what} already exists"),
            Self::Store(err) => err.fmt(f),
            Self::PasswordHash(err) => write!(f, "password hashing failed: {err}"),
        }
    }
}

impl std::error::Error for FacadeError {}

impl From<ValidationError> for FacadeError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StoreError> for FacadeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => Self::Conflict(what),
            other => Self::Store(other),
        }
    }
}

/// Orchestrates users, amenities, places, and reviews over injected
/// stores. Constructed once at startup and shared behind an `Arc`.
pub struct Facade {
    users: Arc<dyn UserStore>,
    amenities: Arc<dyn AmenityStore>,
    places: Arc<dyn PlaceStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl Facade {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        amenities: Arc<dyn AmenityStore>,
        places: Arc<dyn PlaceStore>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            users,
            amenities,
            places,
            reviews,
        }
    }

    /// Facade over in-memory stores (development and tests).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryAmenityStore::new()),
            Arc::new(MemoryPlaceStore::new()),
            Arc::new(MemoryReviewStore::new()),
        )
    }

    /// Facade over the relational backend, sharing one pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgAmenityStore::new(pool.clone())),
            Arc::new(PgPlaceStore::new(pool.clone())),
            Arc::new(PgReviewStore::new(pool)),
        )
    }

    // --- users ---

    /// Create a user with a hashed password.
    ///
    /// Email uniqueness is checked by the caller before invoking this
    /// (handlers run the duplicate lookup); the relational backend
    /// additionally enforces UNIQUE and surfaces it as `Conflict`.
    ///
    /// # Errors
    /// `Validation` on malformed input, `Conflict` on a storage-level
    /// email collision.
    pub async fn create_user(&self, data: NewUser) -> Result<UserView, FacadeError> {
        guards::check_new_user(&data)?;
        let raw = data.password.unwrap_or_default();
        let password_hash = password::hash_password(&raw).map_err(FacadeError::PasswordHash)?;
        let user = User::new(
            data.first_name,
            data.last_name,
            data.email,
            password_hash,
            data.is_admin,
        )?;
        let stored = self.users.add(user).await?;
        Ok(UserView::from(&stored))
    }

    /// # Errors
    /// `NotFound` when no user has this id.
    pub async fn get_user(&self, id: Uuid) -> Result<UserView, FacadeError> {
        let user = self.users.get(id).await?.ok_or(FacadeError::NotFound("User"))?;
        Ok(UserView::from(&user))
    }

    /// # Errors
    /// `Store` on backend faults.
    pub async fn get_all_users(&self) -> Result<Vec<UserView>, FacadeError> {
        let users = self.users.get_all().await?;
        Ok(users.iter().map(UserView::from).collect())
    }

    /// Full user record by email; the login handler needs the password
    /// hash, which no view exposes.
    ///
    /// # Errors
    /// `Store` on backend faults.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, FacadeError> {
        Ok(self.users.get_by_email(email).await?)
    }

    /// Update a user. A changed email is re-checked against other users;
    /// a new password is hashed before it touches the store.
    ///
    /// # Errors
    /// `NotFound`, `Validation`, or `Conflict` on an email collision.
    pub async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<UserView, FacadeError> {
        guards::check_update_user(&data)?;
        let mut user = self.users.get(id).await?.ok_or(FacadeError::NotFound("User"))?;
        if let Some(email) = &data.email {
            if let Some(other) = self.users.get_by_email(email).await? {
                if other.id != id {
                    return Err(FacadeError::Conflict("Email"));
                }
            }
        }
        let password_hash = match data.password {
            Some(raw) => Some(password::hash_password(&raw).map_err(FacadeError::PasswordHash)?),
            None => None,
        };
        user.apply(UserPatch {
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            password_hash,
            is_admin: data.is_admin,
        })?;
        let stored = self
            .users
            .update(user)
            .await?
            .ok_or(FacadeError::NotFound("User"))?;
        Ok(UserView::from(&stored))
    }

    /// Delete a user together with everything they own: their reviews,
    /// their places, and the reviews of those places. Children go first
    /// so an interrupted cascade never leaves a dangling reference.
    ///
    /// # Errors
    /// `NotFound` when no user has this id.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), FacadeError> {
        if self.users.get(id).await?.is_none() {
            return Err(FacadeError::NotFound("User"));
        }
        for review in self.reviews.get_by_user(id).await? {
            self.reviews.delete(review.id).await?;
        }
        for place in self.places.get_by_owner(id).await? {
            for review in self.reviews.get_by_place(place.id).await? {
                self.reviews.delete(review.id).await?;
            }
            self.places.delete(place.id).await?;
        }
        self.users.delete(id).await?;
        Ok(())
    }

    // --- amenities ---

    /// # Errors
    /// `Validation` on a blank name, `Conflict` when the name is taken.
    pub async fn create_amenity(&self, data: NewAmenity) -> Result<AmenityView, FacadeError> {
        guards::check_new_amenity(&data)?;
        if self.amenities.get_by_name(&data.name).await?.is_some() {
            return Err(FacadeError::Conflict("Amenity name"));
        }
        let amenity = Amenity::new(data.name, data.description)?;
        let stored = self.amenities.add(amenity).await?;
        Ok(AmenityView::from(&stored))
    }

    /// # Errors
    /// `NotFound` when no amenity has this id.
    pub async fn get_amenity(&self, id: Uuid) -> Result<AmenityView, FacadeError> {
        let amenity = self
            .amenities
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Amenity"))?;
        Ok(AmenityView::from(&amenity))
    }

    /// # Errors
    /// `Store` on backend faults.
    pub async fn get_all_amenities(&self) -> Result<Vec<AmenityView>, FacadeError> {
        let amenities = self.amenities.get_all().await?;
        Ok(amenities.iter().map(AmenityView::from).collect())
    }

    /// # Errors
    /// `NotFound`, `Validation`, or `Conflict` on a name collision.
    pub async fn update_amenity(
        &self,
        id: Uuid,
        data: UpdateAmenity,
    ) -> Result<AmenityView, FacadeError> {
        guards::check_update_amenity(&data)?;
        let mut amenity = self
            .amenities
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Amenity"))?;
        if let Some(name) = &data.name {
            if let Some(other) = self.amenities.get_by_name(name).await? {
                if other.id != id {
                    return Err(FacadeError::Conflict("Amenity name"));
                }
            }
        }
        amenity.apply(AmenityPatch {
            name: data.name,
            description: data.description,
        })?;
        let stored = self
            .amenities
            .update(amenity)
            .await?
            .ok_or(FacadeError::NotFound("Amenity"))?;
        Ok(AmenityView::from(&stored))
    }

    /// Delete an amenity and unlink it from every place that lists it.
    /// The relational backend also cascades through the link table; the
    /// explicit unlink keeps the in-memory backend consistent.
    ///
    /// # Errors
    /// `NotFound` when no amenity has this id.
    pub async fn delete_amenity(&self, id: Uuid) -> Result<(), FacadeError> {
        if self.amenities.get(id).await?.is_none() {
            return Err(FacadeError::NotFound("Amenity"));
        }
        for mut place in self.places.get_all().await? {
            if place.remove_amenity(id) {
                self.places.update(place).await?;
            }
        }
        self.amenities.delete(id).await?;
        Ok(())
    }

    // --- places ---

    /// Create a place. The owner must resolve; every listed amenity id
    /// must resolve or the whole creation fails (fail-fast, no silent
    /// skipping).
    ///
    /// # Errors
    /// `Validation` or `Reference`; nothing is written on either.
    pub async fn create_place(&self, data: NewPlace) -> Result<PlaceDetail, FacadeError> {
        guards::check_new_place(&data)?;
        let owner_id = data
            .owner_id
            .ok_or(FacadeError::Validation(ValidationError::Empty("owner_id")))?;
        let owner = self
            .users
            .get(owner_id)
            .await?
            .ok_or(FacadeError::Reference {
                entity: "User",
                id: owner_id,
            })?;
        // Existence check only; the view below is built from the stored
        // ids, which construction has deduplicated.
        self.resolve_amenities(&data.amenities).await?;
        let place = Place::new(
            data.title,
            data.description,
            data.price,
            data.latitude,
            data.longitude,
            owner.id,
            data.amenities,
        )?;
        let stored = self.places.add(place).await?;
        let amenities = self.resolve_amenities(&stored.amenity_ids).await?;
        Ok(self.assemble_place(stored, owner, amenities).await?)
    }

    /// Composed place view: owner, amenities, and reviews expanded.
    /// Recomputed on every call; nothing is cached.
    ///
    /// # Errors
    /// `NotFound` when no place has this id.
    pub async fn get_place(&self, id: Uuid) -> Result<PlaceDetail, FacadeError> {
        let place = self
            .places
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        self.compose_place(place).await
    }

    /// # Errors
    /// `Store` on backend faults.
    pub async fn get_all_places(&self) -> Result<Vec<PlaceSummary>, FacadeError> {
        let places = self.places.get_all().await?;
        Ok(places.iter().map(PlaceSummary::from).collect())
    }

    /// Owner id of a place, for handler-side authorization.
    ///
    /// # Errors
    /// `NotFound` when no place has this id.
    pub async fn place_owner(&self, id: Uuid) -> Result<Uuid, FacadeError> {
        let place = self
            .places
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        Ok(place.owner_id)
    }

    /// Update a place. A present `owner_id` is re-resolved; a present
    /// `amenities` list replaces the whole linked set and every id must
    /// resolve.
    ///
    /// # Errors
    /// `NotFound`, `Validation`, or `Reference`.
    pub async fn update_place(&self, id: Uuid, data: UpdatePlace) -> Result<PlaceDetail, FacadeError> {
        guards::check_update_place(&data)?;
        let mut place = self
            .places
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        if let Some(owner_id) = data.owner_id {
            if self.users.get(owner_id).await?.is_none() {
                return Err(FacadeError::Reference {
                    entity: "User",
                    id: owner_id,
                });
            }
        }
        if let Some(amenities) = &data.amenities {
            self.resolve_amenities(amenities).await?;
        }
        place.apply(PlacePatch {
            title: data.title,
            description: data.description,
            price: data.price,
            latitude: data.latitude,
            longitude: data.longitude,
            owner_id: data.owner_id,
            amenity_ids: data.amenities,
        })?;
        let stored = self
            .places
            .update(place)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        self.compose_place(stored).await
    }

    /// Delete a place and its reviews, reviews first.
    ///
    /// # Errors
    /// `NotFound` when no place has this id.
    pub async fn delete_place(&self, id: Uuid) -> Result<(), FacadeError> {
        if self.places.get(id).await?.is_none() {
            return Err(FacadeError::NotFound("Place"));
        }
        for review in self.reviews.get_by_place(id).await? {
            self.reviews.delete(review.id).await?;
        }
        self.places.delete(id).await?;
        Ok(())
    }

    /// Amenities linked to a place, in link order.
    ///
    /// # Errors
    /// `NotFound` when no place has this id.
    pub async fn get_amenities_by_place(&self, id: Uuid) -> Result<Vec<AmenityRef>, FacadeError> {
        let place = self
            .places
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        self.amenity_refs(&place.amenity_ids).await
    }

    /// Link an amenity to a place; linking one already present is a
    /// no-op.
    ///
    /// # Errors
    /// `NotFound` for the place, `Reference` for the amenity.
    pub async fn add_amenity_to_place(
        &self,
        place_id: Uuid,
        amenity_id: Uuid,
    ) -> Result<PlaceDetail, FacadeError> {
        let mut place = self
            .places
            .get(place_id)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        if self.amenities.get(amenity_id).await?.is_none() {
            return Err(FacadeError::Reference {
                entity: "Amenity",
                id: amenity_id,
            });
        }
        place.add_amenity(amenity_id);
        let stored = self
            .places
            .update(place)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        self.compose_place(stored).await
    }

    /// Unlink an amenity from a place.
    ///
    /// # Errors
    /// `NotFound` for the place, or for the link when it does not exist.
    pub async fn remove_amenity_from_place(
        &self,
        place_id: Uuid,
        amenity_id: Uuid,
    ) -> Result<(), FacadeError> {
        let mut place = self
            .places
            .get(place_id)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        if !place.remove_amenity(amenity_id) {
            return Err(FacadeError::NotFound("Amenity"));
        }
        self.places
            .update(place)
            .await?
            .ok_or(FacadeError::NotFound("Place"))?;
        Ok(())
    }

    // --- reviews ---

    /// Create a review. Both the author and the place must resolve.
    ///
    /// # Errors
    /// `Validation` or `Reference`; nothing is written on either.
    pub async fn create_review(&self, data: NewReview) -> Result<ReviewView, FacadeError> {
        guards::check_new_review(&data)?;
        let user_id = data
            .user_id
            .ok_or(FacadeError::Validation(ValidationError::Empty("user_id")))?;
        let place_id = data
            .place_id
            .ok_or(FacadeError::Validation(ValidationError::Empty("place_id")))?;
        if self.users.get(user_id).await?.is_none() {
            return Err(FacadeError::Reference {
                entity: "User",
                id: user_id,
            });
        }
        if self.places.get(place_id).await?.is_none() {
            return Err(FacadeError::Reference {
                entity: "Place",
                id: place_id,
            });
        }
        let review = Review::new(data.text, data.rating, place_id, user_id)?;
        let stored = self.reviews.add(review).await?;
        Ok(ReviewView::from(&stored))
    }

    /// # Errors
    /// `NotFound` when no review has this id.
    pub async fn get_review(&self, id: Uuid) -> Result<ReviewView, FacadeError> {
        let review = self
            .reviews
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Review"))?;
        Ok(ReviewView::from(&review))
    }

    /// # Errors
    /// `Store` on backend faults.
    pub async fn get_all_reviews(&self) -> Result<Vec<ReviewView>, FacadeError> {
        let reviews = self.reviews.get_all().await?;
        Ok(reviews.iter().map(ReviewView::from).collect())
    }

    /// Reviews of one place; the place itself must exist.
    ///
    /// # Errors
    /// `NotFound` when no place has this id.
    pub async fn get_reviews_by_place(&self, place_id: Uuid) -> Result<Vec<ReviewView>, FacadeError> {
        if self.places.get(place_id).await?.is_none() {
            return Err(FacadeError::NotFound("Place"));
        }
        let reviews = self.reviews.get_by_place(place_id).await?;
        Ok(reviews.iter().map(ReviewView::from).collect())
    }

    /// # Errors
    /// `NotFound` or `Validation`.
    pub async fn update_review(
        &self,
        id: Uuid,
        data: UpdateReview,
    ) -> Result<ReviewView, FacadeError> {
        guards::check_update_review(&data)?;
        let mut review = self
            .reviews
            .get(id)
            .await?
            .ok_or(FacadeError::NotFound("Review"))?;
        review.apply(ReviewPatch {
            text: data.text,
            rating: data.rating,
        })?;
        let stored = self
            .reviews
            .update(review)
            .await?
            .ok_or(FacadeError::NotFound("Review"))?;
        Ok(ReviewView::from(&stored))
    }

    /// # Errors
    /// `NotFound` when no review has this id.
    pub async fn delete_review(&self, id: Uuid) -> Result<(), FacadeError> {
        if self.reviews.get(id).await?.is_none() {
            return Err(FacadeError::NotFound("Review"));
        }
        self.reviews.delete(id).await?;
        Ok(())
    }

    // --- composition helpers ---

    /// Resolve every amenity id or fail on the first one that does not
    /// exist.
    async fn resolve_amenities(&self, ids: &[Uuid]) -> Result<Vec<Amenity>, FacadeError> {
        let mut amenities = Vec::with_capacity(ids.len());
        for id in ids {
            let amenity = self
                .amenities
                .get(*id)
                .await?
                .ok_or(FacadeError::Reference {
                    entity: "Amenity",
                    id: *id,
                })?;
            amenities.push(amenity);
        }
        Ok(amenities)
    }

    async fn amenity_refs(&self, ids: &[Uuid]) -> Result<Vec<AmenityRef>, FacadeError> {
        let amenities = self.resolve_amenities(ids).await?;
        Ok(amenities.iter().map(AmenityRef::from).collect())
    }

    async fn compose_place(&self, place: Place) -> Result<PlaceDetail, FacadeError> {
        let owner = self
            .users
            .get(place.owner_id)
            .await?
            .ok_or(FacadeError::Reference {
                entity: "User",
                id: place.owner_id,
            })?;
        let amenities = self.resolve_amenities(&place.amenity_ids).await?;
        self.assemble_place(place, owner, amenities).await
    }

    async fn assemble_place(
        &self,
        place: Place,
        owner: User,
        amenities: Vec<Amenity>,
    ) -> Result<PlaceDetail, FacadeError> {
        let mut reviews = Vec::new();
        for review in self.reviews.get_by_place(place.id).await? {
            let author = self
                .users
                .get(review.user_id)
                .await?
                .ok_or(FacadeError::Reference {
                    entity: "User",
                    id: review.user_id,
                })?;
            reviews.push(PlaceReview {
                id: review.id,
                text: review.text,
                rating: review.rating,
                user: OwnerRef::from(&author),
            });
        }
        Ok(PlaceDetail {
            id: place.id,
            title: place.title,
            description: place.description,
            price: place.price,
            latitude: place.latitude,
            longitude: place.longitude,
            owner: OwnerRef::from(&owner),
            amenities: amenities.iter().map(AmenityRef::from).collect(),
            reviews,
            created_at: place.created_at,
            updated_at: place.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: Some("x".to_string()),
            is_admin: false,
        }
    }

    fn new_place(owner_id: Uuid, amenities: Vec<Uuid>) -> NewPlace {
        NewPlace {
            title: "Cabin".to_string(),
            description: String::new(),
            price: 100.0,
            latitude: 10.0,
            longitude: 20.0,
            owner_id: Some(owner_id),
            amenities,
        }
    }

    async fn seed_user(facade: &Facade, email: &str) -> UserView {
        facade.create_user(new_user(email)).await.expect("create user")
    }

    #[tokio::test]
    async fn create_user_hashes_password_and_round_trips() {
        let facade = Facade::in_memory();
        let created = seed_user(&facade, "john@example.com").await;
        let fetched = facade.get_user(created.id).await.expect("get user");
        assert_eq!(fetched.first_name, "John");
        assert_eq!(fetched.email, "john@example.com");

        let record = facade
            .get_user_by_email("john@example.com")
            .await
            .expect("lookup")
            .expect("present");
        assert_ne!(record.password_hash, "x");
        assert!(crate::auth::verify_password(&record.password_hash, "x"));
    }

    #[tokio::test]
    async fn create_user_requires_password() {
        let facade = Facade::in_memory();
        let mut data = new_user("john@example.com");
        data.password = None;
        let err = facade.create_user(data).await.expect_err("must fail");
        assert!(matches!(
            err,
            FacadeError::Validation(ValidationError::Empty("Password"))
        ));
    }

    #[tokio::test]
    async fn update_user_rejects_colliding_email() {
        let facade = Facade::in_memory();
        seed_user(&facade, "a@example.com").await;
        let second = seed_user(&facade, "b@example.com").await;

        let err = facade
            .update_user(
                second.id,
                UpdateUser {
                    email: Some("a@example.com".to_string()),
                    ..UpdateUser::default()
                },
            )
            .await
            .expect_err("collision must fail");
        assert!(matches!(err, FacadeError::Conflict("Email")));

        // Re-submitting one's own email is not a collision.
        facade
            .update_user(
                second.id,
                UpdateUser {
                    email: Some("b@example.com".to_string()),
                    ..UpdateUser::default()
                },
            )
            .await
            .expect("own email is fine");
    }

    #[tokio::test]
    async fn create_place_with_unknown_owner_writes_nothing() {
        let facade = Facade::in_memory();
        let ghost = Uuid::new_v4();
        let err = facade
            .create_place(new_place(ghost, Vec::new()))
            .await
            .expect_err("unknown owner must fail");
        assert!(matches!(err, FacadeError::Reference { entity: "User", .. }));
        assert!(facade.get_all_places().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn create_place_fails_fast_on_unknown_amenity() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let wifi = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");

        let err = facade
            .create_place(new_place(owner.id, vec![wifi.id, Uuid::new_v4()]))
            .await
            .expect_err("one unresolvable amenity fails the whole creation");
        assert!(matches!(
            err,
            FacadeError::Reference {
                entity: "Amenity",
                ..
            }
        ));
        assert!(facade.get_all_places().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn create_place_view_deduplicates_amenities() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let wifi = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");

        // A repeated id links once; the creation response must show the
        // same set every later read composes.
        let created = facade
            .create_place(new_place(owner.id, vec![wifi.id, wifi.id]))
            .await
            .expect("create place");
        assert_eq!(created.amenities.len(), 1);

        let fetched = facade.get_place(created.id).await.expect("get place");
        assert_eq!(
            serde_json::to_value(&created.amenities).expect("serialize"),
            serde_json::to_value(&fetched.amenities).expect("serialize")
        );
    }

    #[tokio::test]
    async fn get_place_composes_owner_amenities_and_reviews() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let wifi = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");
        let place = facade
            .create_place(new_place(owner.id, vec![wifi.id]))
            .await
            .expect("create place");
        facade
            .create_review(NewReview {
                text: "Nice".to_string(),
                rating: 5,
                user_id: Some(owner.id),
                place_id: Some(place.id),
            })
            .await
            .expect("create review");

        let detail = facade.get_place(place.id).await.expect("get place");
        assert_eq!(detail.owner.email, "john@example.com");
        assert_eq!(detail.amenities.len(), 1);
        assert_eq!(detail.amenities[0].name, "Wi-Fi");
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].rating, 5);
        assert_eq!(detail.reviews[0].user.id, owner.id);

        // Idempotent: a second read without mutation composes identically.
        let again = facade.get_place(place.id).await.expect("get place");
        assert_eq!(
            serde_json::to_value(&detail).expect("serialize"),
            serde_json::to_value(&again).expect("serialize")
        );
    }

    #[tokio::test]
    async fn update_place_replaces_amenity_set_fail_fast() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let wifi = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");
        let sauna = facade
            .create_amenity(NewAmenity {
                name: "Sauna".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");
        let place = facade
            .create_place(new_place(owner.id, vec![wifi.id]))
            .await
            .expect("create place");

        let err = facade
            .update_place(
                place.id,
                UpdatePlace {
                    amenities: Some(vec![sauna.id, Uuid::new_v4()]),
                    ..UpdatePlace::default()
                },
            )
            .await
            .expect_err("unresolvable id fails the whole update");
        assert!(matches!(
            err,
            FacadeError::Reference {
                entity: "Amenity",
                ..
            }
        ));
        // Failed update left the original set in place.
        let detail = facade.get_place(place.id).await.expect("get place");
        assert_eq!(detail.amenities[0].id, wifi.id);

        let detail = facade
            .update_place(
                place.id,
                UpdatePlace {
                    amenities: Some(vec![sauna.id]),
                    ..UpdatePlace::default()
                },
            )
            .await
            .expect("valid replacement");
        assert_eq!(detail.amenities.len(), 1);
        assert_eq!(detail.amenities[0].id, sauna.id);
    }

    #[tokio::test]
    async fn update_place_revalidates_ranges_and_owner() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let place = facade
            .create_place(new_place(owner.id, Vec::new()))
            .await
            .expect("create place");

        let err = facade
            .update_place(
                place.id,
                UpdatePlace {
                    latitude: Some(91.0),
                    ..UpdatePlace::default()
                },
            )
            .await
            .expect_err("latitude out of range");
        assert!(matches!(
            err,
            FacadeError::Validation(ValidationError::LatitudeOutOfRange)
        ));

        let err = facade
            .update_place(
                place.id,
                UpdatePlace {
                    owner_id: Some(Uuid::new_v4()),
                    ..UpdatePlace::default()
                },
            )
            .await
            .expect_err("unknown owner");
        assert!(matches!(err, FacadeError::Reference { entity: "User", .. }));
    }

    #[tokio::test]
    async fn delete_review_detaches_it_from_the_place() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let place = facade
            .create_place(new_place(owner.id, Vec::new()))
            .await
            .expect("create place");
        let review = facade
            .create_review(NewReview {
                text: "Nice".to_string(),
                rating: 4,
                user_id: Some(owner.id),
                place_id: Some(place.id),
            })
            .await
            .expect("create review");

        facade.delete_review(review.id).await.expect("delete review");
        assert!(facade
            .get_reviews_by_place(place.id)
            .await
            .expect("list")
            .is_empty());
        assert!(matches!(
            facade.get_review(review.id).await,
            Err(FacadeError::NotFound("Review"))
        ));
    }

    #[tokio::test]
    async fn create_review_requires_resolvable_references() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let err = facade
            .create_review(NewReview {
                text: "Nice".to_string(),
                rating: 3,
                user_id: Some(owner.id),
                place_id: Some(Uuid::new_v4()),
            })
            .await
            .expect_err("unknown place");
        assert!(matches!(
            err,
            FacadeError::Reference {
                entity: "Place",
                ..
            }
        ));
        assert!(facade.get_all_reviews().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn delete_place_cascades_reviews() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let place = facade
            .create_place(new_place(owner.id, Vec::new()))
            .await
            .expect("create place");
        let review = facade
            .create_review(NewReview {
                text: "Nice".to_string(),
                rating: 4,
                user_id: Some(owner.id),
                place_id: Some(place.id),
            })
            .await
            .expect("create review");

        facade.delete_place(place.id).await.expect("delete place");
        assert!(matches!(
            facade.get_place(place.id).await,
            Err(FacadeError::NotFound("Place"))
        ));
        assert!(matches!(
            facade.get_review(review.id).await,
            Err(FacadeError::NotFound("Review"))
        ));
    }

    #[tokio::test]
    async fn delete_user_cascades_places_and_reviews() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "owner@example.com").await;
        let guest = seed_user(&facade, "guest@example.com").await;
        let place = facade
            .create_place(new_place(owner.id, Vec::new()))
            .await
            .expect("create place");
        let by_owner = facade
            .create_review(NewReview {
                text: "My own place".to_string(),
                rating: 5,
                user_id: Some(owner.id),
                place_id: Some(place.id),
            })
            .await
            .expect("create review");
        let by_guest = facade
            .create_review(NewReview {
                text: "Lovely".to_string(),
                rating: 4,
                user_id: Some(guest.id),
                place_id: Some(place.id),
            })
            .await
            .expect("create review");

        facade.delete_user(owner.id).await.expect("delete user");
        assert!(matches!(
            facade.get_user(owner.id).await,
            Err(FacadeError::NotFound("User"))
        ));
        assert!(matches!(
            facade.get_place(place.id).await,
            Err(FacadeError::NotFound("Place"))
        ));
        // Both the owner's review and the guest review of the deleted
        // place are gone; the guest account survives.
        assert!(matches!(
            facade.get_review(by_owner.id).await,
            Err(FacadeError::NotFound("Review"))
        ));
        assert!(matches!(
            facade.get_review(by_guest.id).await,
            Err(FacadeError::NotFound("Review"))
        ));
        facade.get_user(guest.id).await.expect("guest survives");
    }

    #[tokio::test]
    async fn delete_amenity_unlinks_it_from_places() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let wifi = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");
        let place = facade
            .create_place(new_place(owner.id, vec![wifi.id]))
            .await
            .expect("create place");

        facade.delete_amenity(wifi.id).await.expect("delete amenity");
        let detail = facade.get_place(place.id).await.expect("get place");
        assert!(detail.amenities.is_empty());
    }

    #[tokio::test]
    async fn amenity_names_are_unique() {
        let facade = Facade::in_memory();
        facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");
        let err = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect_err("duplicate name must fail");
        assert!(matches!(err, FacadeError::Conflict("Amenity name")));
    }

    #[tokio::test]
    async fn amenity_link_and_unlink() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let place = facade
            .create_place(new_place(owner.id, Vec::new()))
            .await
            .expect("create place");
        let wifi = facade
            .create_amenity(NewAmenity {
                name: "Wi-Fi".to_string(),
                description: String::new(),
            })
            .await
            .expect("create amenity");

        let detail = facade
            .add_amenity_to_place(place.id, wifi.id)
            .await
            .expect("link");
        assert_eq!(detail.amenities.len(), 1);
        // Linking twice is a no-op.
        let detail = facade
            .add_amenity_to_place(place.id, wifi.id)
            .await
            .expect("link again");
        assert_eq!(detail.amenities.len(), 1);

        facade
            .remove_amenity_from_place(place.id, wifi.id)
            .await
            .expect("unlink");
        assert!(matches!(
            facade.remove_amenity_from_place(place.id, wifi.id).await,
            Err(FacadeError::NotFound("Amenity"))
        ));
        assert!(facade
            .get_amenities_by_place(place.id)
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn reviews_by_place_requires_the_place() {
        let facade = Facade::in_memory();
        assert!(matches!(
            facade.get_reviews_by_place(Uuid::new_v4()).await,
            Err(FacadeError::NotFound("Place"))
        ));
    }

    #[tokio::test]
    async fn update_review_revalidates() {
        let facade = Facade::in_memory();
        let owner = seed_user(&facade, "john@example.com").await;
        let place = facade
            .create_place(new_place(owner.id, Vec::new()))
            .await
            .expect("create place");
        let review = facade
            .create_review(NewReview {
                text: "Nice".to_string(),
                rating: 3,
                user_id: Some(owner.id),
                place_id: Some(place.id),
            })
            .await
            .expect("create review");

        let err = facade
            .update_review(
                review.id,
                UpdateReview {
                    rating: Some(6),
                    ..UpdateReview::default()
                },
            )
            .await
            .expect_err("rating 6 must fail");
        assert!(matches!(
            err,
            FacadeError::Validation(ValidationError::RatingOutOfRange)
        ));

        let updated = facade
            .update_review(
                review.id,
                UpdateReview {
                    text: Some("Even better".to_string()),
                    rating: Some(5),
                },
            )
            .await
            .expect("valid update");
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.text, "Even better");
    }
}
