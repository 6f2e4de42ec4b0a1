use crate::api;
use crate::domain;
use crate::models;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::user::create_user,
        api::user::list_users,
        api::user::get_user_by_id,
        api::user::lookup_user,
        api::user::update_user,
        api::user::delete_user,
        api::product::create_product,
        api::product::list_products,
        api::product::get_product,
        api::product::update_product,
        api::product::delete_product,
        api::product::products_by_seller,
        api::product::create_product_image,
        api::product::attach_tag,
        api::tag::create_tag,
        api::tag::list_tags,
        api::review::create_review,
        api::favorite::create_favorite,
        api::subscription::create_subscription,
    ),
    components(
        schemas(
            domain::UserCreate,
            domain::UserUpdate,
            domain::Product,
            domain::ProductImage,
            domain::ProductCreate,
            domain::ProductUpdate,
            domain::ProductImageCreate,
            domain::Tag,
            domain::TagCreate,
            domain::TagUpdate,
            domain::Review,
            domain::ReviewCreate,
            domain::ReviewUpdate,
            domain::Favorite,
            domain::FavoriteCreate,
            domain::Subscription,
            domain::SubscriptionCreate,
            domain::SubscriptionUpdate,
            models::UserType,
            models::SubscriptionLevel,
        )
    ),
    tags(
        (name = "crafty", description = "Crafty marketplace API")
    )
)]
pub struct ApiDoc;
