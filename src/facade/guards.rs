//! Pre-condition guards for facade mutation entry points.
//!
//! These run before any store or cross-entity lookup, so malformed input
//! never causes side effects. They intentionally overlap with the model
//! `validate()` checks; the duplication is defense in depth, each layer
//! holds even if the other is bypassed.

use crate::models::user::valid_email;
use crate::models::{place, user, ValidationError};

use super::types::{
    NewAmenity, NewPlace, NewReview, NewUser, UpdateAmenity, UpdatePlace, UpdateReview, UpdateUser,
};

pub fn check_new_user(data: &NewUser) -> Result<(), ValidationError> {
    check_name("First name", &data.first_name)?;
    check_name("Last name", &data.last_name)?;
    check_email(&data.email)?;
    match &data.password {
        Some(password) if !password.is_empty() => Ok(()),
        _ => Err(ValidationError::Empty("Password")),
    }
}

pub fn check_update_user(data: &UpdateUser) -> Result<(), ValidationError> {
    if let Some(first_name) = &data.first_name {
        check_name("First name", first_name)?;
    }
    if let Some(last_name) = &data.last_name {
        check_name("Last name", last_name)?;
    }
    if let Some(email) = &data.email {
        check_email(email)?;
    }
    if let Some(password) = &data.password {
        if password.is_empty() {
            return Err(ValidationError::Empty("Password"));
        }
    }
    Ok(())
}

pub fn check_new_amenity(data: &NewAmenity) -> Result<(), ValidationError> {
    non_empty("Amenity name", &data.name)
}

pub fn check_update_amenity(data: &UpdateAmenity) -> Result<(), ValidationError> {
    if let Some(name) = &data.name {
        non_empty("Amenity name", name)?;
    }
    Ok(())
}

pub fn check_new_place(data: &NewPlace) -> Result<(), ValidationError> {
    check_title(&data.title)?;
    check_price(data.price)?;
    check_latitude(data.latitude)?;
    check_longitude(data.longitude)
}

pub fn check_update_place(data: &UpdatePlace) -> Result<(), ValidationError> {
    if let Some(title) = &data.title {
        check_title(title)?;
    }
    if let Some(price) = data.price {
        check_price(price)?;
    }
    if let Some(latitude) = data.latitude {
        check_latitude(latitude)?;
    }
    if let Some(longitude) = data.longitude {
        check_longitude(longitude)?;
    }
    Ok(())
}

pub fn check_new_review(data: &NewReview) -> Result<(), ValidationError> {
    non_empty("Review text", &data.text)?;
    check_rating(data.rating)
}

pub fn check_update_review(data: &UpdateReview) -> Result<(), ValidationError> {
    if let Some(text) = &data.text {
        non_empty("Review text", text)?;
    }
    if let Some(rating) = data.rating {
        check_rating(rating)?;
    }
    Ok(())
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    non_empty(field, value)?;
    if value.len() > user::NAME_MAX {
        return Err(ValidationError::TooLong {
            field,
            max: user::NAME_MAX,
        });
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    non_empty("Email", email)?;
    if !valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    non_empty("Title", title)?;
    if title.len() > place::TITLE_MAX {
        return Err(ValidationError::TooLong {
            field: "Title",
            max: place::TITLE_MAX,
        });
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(())
}

fn check_latitude(latitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::LatitudeOutOfRange);
    }
    Ok(())
}

fn check_longitude(longitude: f64) -> Result<(), ValidationError> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::LongitudeOutOfRange);
    }
    Ok(())
}

fn check_rating(rating: i32) -> Result<(), ValidationError> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_place(price: f64, latitude: f64, longitude: f64) -> NewPlace {
        NewPlace {
            title: "Cabin".to_string(),
            description: String::new(),
            price,
            latitude,
            longitude,
            owner_id: None,
            amenities: Vec::new(),
        }
    }

    #[test]
    fn new_user_requires_password() {
        let data = NewUser {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            password: None,
            is_admin: false,
        };
        assert_eq!(
            check_new_user(&data),
            Err(ValidationError::Empty("Password"))
        );
    }

    #[test]
    fn new_user_rejects_bad_email() {
        let data = NewUser {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "nope".to_string(),
            password: Some("x".to_string()),
            is_admin: false,
        };
        assert_eq!(check_new_user(&data), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn place_price_must_be_positive() {
        assert_eq!(
            check_new_place(&new_place(0.0, 0.0, 0.0)),
            Err(ValidationError::NonPositivePrice)
        );
        assert_eq!(
            check_new_place(&new_place(-3.5, 0.0, 0.0)),
            Err(ValidationError::NonPositivePrice)
        );
        assert!(check_new_place(&new_place(0.01, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn coordinates_accept_boundaries_and_reject_beyond() {
        assert!(check_new_place(&new_place(1.0, -90.0, -180.0)).is_ok());
        assert!(check_new_place(&new_place(1.0, 90.0, 180.0)).is_ok());
        assert_eq!(
            check_new_place(&new_place(1.0, -90.01, 0.0)),
            Err(ValidationError::LatitudeOutOfRange)
        );
        assert_eq!(
            check_new_place(&new_place(1.0, 0.0, 180.01)),
            Err(ValidationError::LongitudeOutOfRange)
        );
    }

    #[test]
    fn update_place_checks_only_present_fields() {
        assert!(check_update_place(&UpdatePlace::default()).is_ok());
        let patch = UpdatePlace {
            latitude: Some(91.0),
            ..UpdatePlace::default()
        };
        assert_eq!(
            check_update_place(&patch),
            Err(ValidationError::LatitudeOutOfRange)
        );
    }

    #[test]
    fn review_rating_bounds() {
        for rating in [1, 5] {
            assert!(check_new_review(&NewReview {
                text: "Nice".to_string(),
                rating,
                user_id: None,
                place_id: None,
            })
            .is_ok());
        }
        assert_eq!(
            check_new_review(&NewReview {
                text: "Nice".to_string(),
                rating: 0,
                user_id: None,
                place_id: None,
            }),
            Err(ValidationError::RatingOutOfRange)
        );
    }

    #[test]
    fn amenity_name_must_not_be_blank() {
        assert_eq!(
            check_new_amenity(&NewAmenity {
                name: " ".to_string(),
                description: String::new(),
            }),
            Err(ValidationError::Empty("Amenity name"))
        );
    }
}
