//! Products, their images and their tag links.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::tag::Tag;
use super::validation::{self, nullable};
use super::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub seller_id: i32,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: i32,
    pub image_url: String,
    pub product_id: i32,
}

/// Payload for `POST /products`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    /// Must be zero or more
    pub price: i32,
    pub seller_id: i32,
    /// Tags linked in the same write
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub seller_id: i32,
    pub tag_ids: Vec<i32>,
}

impl ProductCreate {
    pub fn validate(self) -> Result<NewProduct, DomainError> {
        let mut tag_ids = self.tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();

        Ok(NewProduct {
            name: validation::bounded("name", &self.name, 1, 100)?,
            description: self.description,
            price: validation::non_negative("price", self.price)?,
            seller_id: self.seller_id,
            tag_ids,
        })
    }
}

/// Payload for `PUT /products/:id`. Only supplied fields change;
/// `"description": null` clears the description.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub price: Option<i32>,
    pub seller_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<i32>,
    pub seller_id: Option<i32>,
}

impl ProductChanges {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.seller_id.is_none()
    }
}

impl ProductUpdate {
    pub fn validate(self) -> Result<ProductChanges, DomainError> {
        Ok(ProductChanges {
            name: self
                .name
                .as_deref()
                .map(|n| validation::bounded("name", n, 1, 100))
                .transpose()?,
            description: self.description,
            price: self
                .price
                .map(|p| validation::non_negative("price", p))
                .transpose()?,
            seller_id: self.seller_id,
        })
    }
}

/// Payload for `POST /products/:id/images`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductImageCreate {
    pub image_url: String,
}

impl ProductImageCreate {
    pub fn validate(self) -> Result<String, DomainError> {
        validation::bounded("image_url", &self.image_url, 1, 255)
    }
}
