use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Favorite {
    pub id: i32,
    pub buyer_id: i32,
    pub product_id: i32,
}

/// Payload for `POST /favorites`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FavoriteCreate {
    pub buyer_id: i32,
    pub product_id: i32,
}
