use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DomainError, validation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Payload for `POST /tags` and `PUT /tags/:id`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TagCreate {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TagUpdate {
    pub name: Option<String>,
}

pub fn tag_name(value: &str) -> Result<String, DomainError> {
    validation::bounded("name", value, 1, 50)
}

impl TagCreate {
    pub fn validate(self) -> Result<String, DomainError> {
        tag_name(&self.name)
    }
}

impl TagUpdate {
    pub fn validate(self) -> Result<Option<String>, DomainError> {
        self.name.as_deref().map(tag_name).transpose()
    }
}
