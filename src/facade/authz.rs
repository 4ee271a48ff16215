//! Authorization rules, expressed as pure functions over the caller and
//! the resource being touched. Handlers call these after authentication
//! and before the facade mutates anything.

use std::fmt;

use uuid::Uuid;

use super::types::UpdateUser;

/// The authenticated principal a handler acts on behalf of.
///
/// `is_admin` comes from the access token claims, so it reflects the
/// flag at login time, not the current row.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Caller lacks the admin flag for an admin-only operation.
    AdminRequired,
    /// Caller is neither the resource owner nor an admin.
    Unauthorized,
    /// A non-admin tried to change a field only admins may touch.
    RestrictedField(&'static str),
}

impl fmt::Display for AuthzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdminRequired => write!(f, "Admin privileges required"),
            Self::Unauthorized => write!(f, "Unauthorized action"),
            Self::RestrictedField(field) => {
                write!(f, "You cannot modify {field}")
            }
        }
    }
}

impl std::error::Error for AuthzError {}

pub fn require_admin(caller: &Caller) -> Result<(), AuthzError> {
    if caller.is_admin {
        return Ok(());
    }
    Err(AuthzError::AdminRequired)
}

/// Caller must be the user identified by `subject_id`, or an admin.
pub fn require_self_or_admin(caller: &Caller, subject_id: Uuid) -> Result<(), AuthzError> {
    if caller.is_admin || caller.user_id == subject_id {
        return Ok(());
    }
    Err(AuthzError::Unauthorized)
}

/// Caller must own the resource (place or review), or be an admin.
pub fn require_owner_or_admin(caller: &Caller, owner_id: Uuid) -> Result<(), AuthzError> {
    if caller.is_admin || caller.user_id == owner_id {
        return Ok(());
    }
    Err(AuthzError::Unauthorized)
}

/// Non-admins may not touch email, password, or the admin flag on a
/// user update; admins may change anything.
pub fn check_user_patch(caller: &Caller, data: &UpdateUser) -> Result<(), AuthzError> {
    if caller.is_admin {
        return Ok(());
    }
    if let Some(field) = data.touches_restricted_field() {
        return Err(AuthzError::RestrictedField(field));
    }
    Ok(())
}
