pub mod amenities;
pub mod auth;
pub mod health;
pub mod places;
pub mod principal;
pub mod reviews;
pub mod users;

pub use principal::{require_auth, Principal};
