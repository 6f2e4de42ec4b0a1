use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{self, nullable};
use super::DomainError;
use crate::models::Rating;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i32,
    #[schema(value_type = u8, minimum = 1, maximum = 5)]
    pub rating: Rating,
    pub comment: Option<String>,
    pub reviewer_id: i32,
    pub reviewed_user_id: i32,
    pub product_id: Option<i32>,
}

/// Payload for `POST /reviews`.
///
/// The reviewed user is required; the product is optional so a seller can be
/// reviewed outside of a specific listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewCreate {
    #[schema(value_type = u8, minimum = 1, maximum = 5)]
    pub rating: Rating,
    pub comment: Option<String>,
    pub reviewer_id: i32,
    pub reviewed_user_id: i32,
    pub product_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: Rating,
    pub comment: Option<String>,
    pub reviewer_id: i32,
    pub reviewed_user_id: i32,
    pub product_id: Option<i32>,
}

impl ReviewCreate {
    pub fn validate(self) -> Result<NewReview, DomainError> {
        if self.reviewer_id == self.reviewed_user_id {
            return Err(DomainError::Validation(
                "users cannot review themselves".to_string(),
            ));
        }

        Ok(NewReview {
            rating: self.rating,
            comment: validation::optional_text("comment", self.comment, 500)?,
            reviewer_id: self.reviewer_id,
            reviewed_user_id: self.reviewed_user_id,
            product_id: self.product_id,
        })
    }
}

/// Payload for `PUT /reviews/:id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewUpdate {
    #[schema(value_type = Option<u8>, minimum = 1, maximum = 5)]
    pub rating: Option<Rating>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub comment: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<Rating>,
    pub comment: Option<Option<String>>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none()
    }
}

impl ReviewUpdate {
    pub fn validate(self) -> Result<ReviewChanges, DomainError> {
        let comment = match self.comment {
            Some(comment) => Some(validation::optional_text("comment", comment, 500)?),
            None => None,
        };
        Ok(ReviewChanges {
            rating: self.rating,
            comment,
        })
    }
}
