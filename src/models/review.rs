//! Review entity.
//!
//! `place_id` and `user_id` are immutable after construction; the patch
//! type only exposes text and rating.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{require_non_empty, ValidationError};

#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub text: String,
    pub rating: i32,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub rating: Option<i32>,
}

impl Review {
    pub fn new(
        text: String,
        rating: i32,
        place_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        let review = Self {
            id: Uuid::new_v4(),
            text,
            rating,
            place_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        review.validate()?;
        Ok(review)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("Review text", &self.text)?;
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange);
        }
        Ok(())
    }

    /// Apply a patch, bump `updated_at`, and re-validate.
    pub fn apply(&mut self, patch: ReviewPatch) -> Result<(), ValidationError> {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        self.updated_at = Utc::now();
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in [1, 5] {
            Review::new("Nice".to_string(), rating, Uuid::new_v4(), Uuid::new_v4())
                .expect("boundary rating is valid");
        }
        for rating in [0, 6] {
            let err = Review::new("Nice".to_string(), rating, Uuid::new_v4(), Uuid::new_v4())
                .expect_err("out-of-range rating must fail");
            assert_eq!(err, ValidationError::RatingOutOfRange);
        }
    }

    #[test]
    fn rejects_blank_text() {
        let err = Review::new(" ".to_string(), 3, Uuid::new_v4(), Uuid::new_v4())
            .expect_err("blank text must fail");
        assert_eq!(err, ValidationError::Empty("Review text"));
    }

    #[test]
    fn apply_revalidates_rating() {
        let mut review =
            Review::new("Nice".to_string(), 3, Uuid::new_v4(), Uuid::new_v4()).expect("valid");
        let err = review
            .apply(ReviewPatch {
                text: None,
                rating: Some(9),
            })
            .expect_err("rating 9 must fail");
        assert_eq!(err, ValidationError::RatingOutOfRange);
    }
}
