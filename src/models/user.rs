//! User entity.
//!
//! The password is only ever held as a one-way hash; the raw value is
//! hashed by the facade before construction and never serialized back.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use super::{require_non_empty, ValidationError};

pub const NAME_MAX: usize = 50;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// Email format check shared by the facade guards and model validation.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Legal updatable fields for a user. `id` and `created_at` are not
/// expressible here, so no update path can overwrite them.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        is_admin: bool,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let user = Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
            is_admin,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("First name", &self.first_name)?;
        if self.first_name.len() > NAME_MAX {
            return Err(ValidationError::TooLong {
                field: "First name",
                max: NAME_MAX,
            });
        }
        require_non_empty("Last name", &self.last_name)?;
        if self.last_name.len() > NAME_MAX {
            return Err(ValidationError::TooLong {
                field: "Last name",
                max: NAME_MAX,
            });
        }
        require_non_empty("Email", &self.email)?;
        if !valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// Apply a patch, bump `updated_at`, and re-validate.
    pub fn apply(&mut self, patch: UserPatch) -> Result<(), ValidationError> {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(is_admin) = patch.is_admin {
            self.is_admin = is_admin;
        }
        self.updated_at = Utc::now();
        self.validate()
    }
}
