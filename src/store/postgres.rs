//! Relational storage backend (PostgreSQL via sqlx).
//!
//! Schema lives in `sql/schema.sql`. Referential cleanup on delete is
//! declared there (`ON DELETE CASCADE`), so unlike the in-memory backend
//! the facade's explicit cascades are a no-op safety net here, not the
//! mechanism.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::models::{Amenity, Place, Review, User};

use super::{is_unique_violation, AmenityStore, PlaceStore, ReviewStore, StoreError, UserStore};

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password")?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Amenity {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Place {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            owner_id: row.try_get("owner_id")?,
            amenity_ids: row.try_get("amenity_ids")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Review {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            rating: row.try_get("rating")?,
            place_id: row.try_get("place_id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

const PLACE_COLUMNS: &str = r"
    p.id, p.title, p.description, p.price, p.latitude, p.longitude,
    p.owner_id, p.created_at, p.updated_at,
    ARRAY(
        SELECT pa.amenity_id FROM place_amenities pa
        WHERE pa.place_id = p.id
        ORDER BY pa.amenity_id
    ) AS amenity_ids
";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn add(&self, user: User) -> Result<User, StoreError> {
        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name, email, password, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict("Email")
            } else {
                StoreError::Database(err)
            }
        })?;
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update(&self, user: User) -> Result<Option<User>, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET first_name = $2, last_name = $3, email = $4, password = $5,
                is_admin = $6, updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict("Email")
            } else {
                StoreError::Database(err)
            }
        })?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(user))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

pub struct PgAmenityStore {
    pool: PgPool,
}

impl PgAmenityStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AmenityStore for PgAmenityStore {
    async fn add(&self, amenity: Amenity) -> Result<Amenity, StoreError> {
        sqlx::query(
            r"
            INSERT INTO amenities (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(amenity.id)
        .bind(&amenity.name)
        .bind(&amenity.description)
        .bind(amenity.created_at)
        .bind(amenity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict("Amenity name")
            } else {
                StoreError::Database(err)
            }
        })?;
        Ok(amenity)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Amenity>, StoreError> {
        Ok(
            sqlx::query_as::<_, Amenity>("SELECT * FROM amenities WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_all(&self) -> Result<Vec<Amenity>, StoreError> {
        Ok(
            sqlx::query_as::<_, Amenity>("SELECT * FROM amenities ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update(&self, amenity: Amenity) -> Result<Option<Amenity>, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE amenities
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(amenity.id)
        .bind(&amenity.name)
        .bind(&amenity.description)
        .bind(amenity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                StoreError::Conflict("Amenity name")
            } else {
                StoreError::Database(err)
            }
        })?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(amenity))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM amenities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Amenity>, StoreError> {
        Ok(
            sqlx::query_as::<_, Amenity>("SELECT * FROM amenities WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

pub struct PgPlaceStore {
    pool: PgPool,
}

impl PgPlaceStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_links(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        place_id: Uuid,
        amenity_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM place_amenities WHERE place_id = $1")
            .bind(place_id)
            .execute(&mut **tx)
            .await?;
        for amenity_id in amenity_ids {
            sqlx::query(
                r"
                INSERT INTO place_amenities (place_id, amenity_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(place_id)
            .bind(amenity_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PlaceStore for PgPlaceStore {
    async fn add(&self, place: Place) -> Result<Place, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r"
            INSERT INTO places (id, title, description, price, latitude, longitude, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(place.id)
        .bind(&place.title)
        .bind(&place.description)
        .bind(place.price)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(place.owner_id)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&mut *tx)
        .await?;
        Self::replace_links(&mut tx, place.id, &place.amenity_ids).await?;
        tx.commit().await?;
        Ok(place)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        let query = format!("SELECT {PLACE_COLUMNS} FROM places p WHERE p.id = $1");
        Ok(sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_all(&self) -> Result<Vec<Place>, StoreError> {
        let query = format!("SELECT {PLACE_COLUMNS} FROM places p ORDER BY p.created_at");
        Ok(sqlx::query_as::<_, Place>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update(&self, place: Place) -> Result<Option<Place>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r"
            UPDATE places
            SET title = $2, description = $3, price = $4, latitude = $5,
                longitude = $6, owner_id = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(place.id)
        .bind(&place.title)
        .bind(&place.description)
        .bind(place.price)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(place.owner_id)
        .bind(place.updated_at)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::replace_links(&mut tx, place.id, &place.amenity_ids).await?;
        tx.commit().await?;
        Ok(Some(place))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<Place>, StoreError> {
        let query =
            format!("SELECT {PLACE_COLUMNS} FROM places p WHERE p.owner_id = $1 ORDER BY p.created_at");
        Ok(sqlx::query_as::<_, Place>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn add(&self, review: Review) -> Result<Review, StoreError> {
        sqlx::query(
            r"
            INSERT INTO reviews (id, text, rating, place_id, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(review.id)
        .bind(&review.text)
        .bind(review.rating)
        .bind(review.place_id)
        .bind(review.user_id)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(review)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        Ok(
            sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_all(&self) -> Result<Vec<Review>, StoreError> {
        Ok(
            sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update(&self, review: Review) -> Result<Option<Review>, StoreError> {
        let result = sqlx::query(
            r"
            UPDATE reviews
            SET text = $2, rating = $3, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(review.id)
        .bind(&review.text)
        .bind(review.rating)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(review))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_place(&self, place_id: Uuid) -> Result<Vec<Review>, StoreError> {
        Ok(sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE place_id = $1 ORDER BY created_at",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, StoreError> {
        Ok(sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
