//! Entity models and field-level validation.
//!
//! Every entity validates itself at construction and after every patch
//! application. The facade runs its own pre-checks before touching the
//! stores; the model checks still run so out-of-range values cannot reach
//! a store even when a caller bypasses the facade guards.

use std::fmt;

pub mod amenity;
pub mod place;
pub mod review;
pub mod user;

pub use amenity::{Amenity, AmenityPatch};
pub use place::{Place, PlacePatch};
pub use review::{Review, ReviewPatch};
pub use user::{User, UserPatch};

/// Field-level validation failure, surfaced to clients as a 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string field was missing or blank once trimmed.
    Empty(&'static str),
    /// A string field exceeded its maximum length.
    TooLong { field: &'static str, max: usize },
    /// Email did not match the accepted pattern.
    InvalidEmail,
    /// Price must be strictly positive.
    NonPositivePrice,
    /// Latitude outside [-90, 90].
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180].
    LongitudeOutOfRange,
    /// Rating outside [1, 5].
    RatingOutOfRange,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{field} cannot be empty"),
            Self::TooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::InvalidEmail => write!(f, "Invalid email format"),
            Self::NonPositivePrice => write!(f, "Price must be a positive number"),
            Self::LatitudeOutOfRange => write!(f, "Latitude must be between -90 and 90"),
            Self::LongitudeOutOfRange => write!(f, "Longitude must be between -180 and 180"),
            Self::RatingOutOfRange => write!(f, "Rating must be between 1 and 5"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}
