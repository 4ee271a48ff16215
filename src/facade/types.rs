//! Facade input payloads and response views.
//!
//! Inputs reject unknown keys outright (`deny_unknown_fields`) instead of
//! silently accepting them. Views are what the HTTP layer serializes;
//! `password` has no representation here and can never leak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Amenity, Place, Review, User};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UpdateUser {
    /// Whether the patch touches fields only admins may change.
    #[must_use]
    pub fn touches_restricted_field(&self) -> Option<&'static str> {
        if self.email.is_some() {
            Some("email")
        } else if self.password.is_some() {
            Some("password")
        } else if self.is_admin.is_some() {
            Some("is_admin")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewAmenity {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAmenity {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewPlace {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Filled in by the handler from the authenticated caller when absent.
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub amenities: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlace {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_id: Option<Uuid>,
    /// Replaces the whole amenity set when present.
    pub amenities: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewReview {
    pub text: String,
    pub rating: i32,
    /// Filled in by the handler from the authenticated caller when absent.
    pub user_id: Option<Uuid>,
    /// Filled in by the handler from the path on the nested route.
    pub place_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AmenityView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Amenity> for AmenityView {
    fn from(amenity: &Amenity) -> Self {
        Self {
            id: amenity.id,
            name: amenity.name.clone(),
            description: amenity.description.clone(),
            created_at: amenity.created_at,
            updated_at: amenity.updated_at,
        }
    }
}

/// Shortened amenity shape nested under a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AmenityRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&Amenity> for AmenityRef {
    fn from(amenity: &Amenity) -> Self {
        Self {
            id: amenity.id,
            name: amenity.name.clone(),
        }
    }
}

/// Shortened user shape nested under places and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OwnerRef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for OwnerRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewView {
    pub id: Uuid,
    pub text: String,
    pub rating: i32,
    pub user_id: Uuid,
    pub place_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            text: review.text.clone(),
            rating: review.rating,
            user_id: review.user_id,
            place_id: review.place_id,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// Review as nested under a place detail, with its author expanded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceReview {
    pub id: Uuid,
    pub text: String,
    pub rating: i32,
    pub user: OwnerRef,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceSummary {
    pub id: Uuid,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Place> for PlaceSummary {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            title: place.title.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

/// Fully composed place: owner, amenities, and reviews expanded.
/// Recomputed on every read; nothing here is cached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner: OwnerRef,
    pub amenities: Vec<AmenityRef>,
    pub reviews: Vec<PlaceReview>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
