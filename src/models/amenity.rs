//! Amenity entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{require_non_empty, ValidationError};

#[derive(Debug, Clone)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AmenityPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Amenity {
    pub fn new(name: String, description: String) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let amenity = Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        };
        amenity.validate()?;
        Ok(amenity)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Amenity name", &self.name)
    }

    /// Apply a patch, bump `updated_at`, and re-validate.
    pub fn apply(&mut self, patch: AmenityPatch) -> Result<(), ValidationError> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let err = Amenity::new("  ".to_string(), String::new()).expect_err("blank name");
        assert_eq!(err, ValidationError::Empty("Amenity name"));
    }

    #[test]
    fn apply_rejects_emptying_the_name() {
        let mut amenity = Amenity::new("Wi-Fi".to_string(), String::new()).expect("valid");
        let err = amenity
            .apply(AmenityPatch {
                name: Some(String::new()),
                description: None,
            })
            .expect_err("empty name must fail");
        assert_eq!(err, ValidationError::Empty("Amenity name"));
    }
}
