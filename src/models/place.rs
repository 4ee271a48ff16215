//! Place entity.
//!
//! A place references its owner and linked amenities by id; the facade
//! resolves those ids against the stores before construction, so a stored
//! place always points at entities that existed at write time.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{require_non_empty, ValidationError};

pub const TITLE_MAX: usize = 100;

#[derive(Debug, Clone)]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Uuid,
    pub amenity_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Legal updatable fields for a place. Setting `amenity_ids` replaces the
/// whole linked set, it is never merged.
#[derive(Debug, Clone, Default)]
pub struct PlacePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_id: Option<Uuid>,
    pub amenity_ids: Option<Vec<Uuid>>,
}

impl Place {
    pub fn new(
        title: String,
        description: String,
        price: f64,
        latitude: f64,
        longitude: f64,
        owner_id: Uuid,
        amenity_ids: Vec<Uuid>,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let place = Self {
            id: Uuid::new_v4(),
            title,
            description,
            price,
            latitude,
            longitude,
            owner_id,
            amenity_ids: dedup(amenity_ids),
            created_at: now,
            updated_at: now,
        };
        place.validate()?;
        Ok(place)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Title", &self.title)?;
        if self.title.len() > TITLE_MAX {
            return Err(ValidationError::TooLong {
                field: "Title",
                max: TITLE_MAX,
            });
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ValidationError::NonPositivePrice);
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange);
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange);
        }
        Ok(())
    }

    /// Apply a patch, bump `updated_at`, and re-validate.
    pub fn apply(&mut self, patch: PlacePatch) -> Result<(), ValidationError> {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(owner_id) = patch.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(amenity_ids) = patch.amenity_ids {
            self.amenity_ids = dedup(amenity_ids);
        }
        self.updated_at = Utc::now();
        self.validate()
    }

    /// Link an amenity; linking one that is already present is a no-op.
    pub fn add_amenity(&mut self, amenity_id: Uuid) {
        if !self.amenity_ids.contains(&amenity_id) {
            self.amenity_ids.push(amenity_id);
            self.updated_at = Utc::now();
        }
    }

    /// Unlink an amenity; returns whether it was linked.
    pub fn remove_amenity(&mut self, amenity_id: Uuid) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|id| *id != amenity_id);
        let removed = self.amenity_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}
