pub mod error;
pub mod favorite;
pub mod health;
pub mod product;
pub mod review;
pub mod subscription;
pub mod tag;
pub mod user;

use axum::{
    Router,
    routing::{get, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users
        .route("/users", get(user::list_users).post(user::create_user))
        .route("/users/id/:id", get(user::get_user_by_id))
        .route("/users/username/:username", get(user::get_user_by_username))
        .route("/users/email/:email", get(user::get_user_by_email))
        .route("/users/lookup/:kind/:identifier", get(user::lookup_user))
        .route("/users/:id", put(user::update_user).delete(user::delete_user))
        // Products
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route(
            "/products/sellers/:seller_id/products",
            get(product::products_by_seller),
        )
        // Product images
        .route(
            "/products/:id/images",
            get(product::list_product_images).post(product::create_product_image),
        )
        .route(
            "/products/images/:image_id",
            get(product::get_product_image).delete(product::delete_product_image),
        )
        // Product tags
        .route("/products/:id/tags", get(product::list_product_tags))
        .route(
            "/products/:id/tags/:tag_id",
            put(product::attach_tag).delete(product::detach_tag),
        )
        // Tags
        .route("/tags", get(tag::list_tags).post(tag::create_tag))
        .route("/tags/name/:name", get(tag::get_tag_by_name))
        .route(
            "/tags/:id",
            get(tag::get_tag).put(tag::update_tag).delete(tag::delete_tag),
        )
        // Reviews
        .route("/reviews", get(review::list_reviews).post(review::create_review))
        .route(
            "/reviews/:id",
            get(review::get_review)
                .put(review::update_review)
                .delete(review::delete_review),
        )
        .route(
            "/reviews/product/:product_id",
            get(review::reviews_for_product),
        )
        .route("/reviews/user/:user_id", get(review::reviews_for_user))
        // Favorites
        .route(
            "/favorites",
            get(favorite::list_favorites).post(favorite::create_favorite),
        )
        .route(
            "/favorites/:id",
            get(favorite::get_favorite).delete(favorite::delete_favorite),
        )
        .route(
            "/favorites/buyer/:buyer_id",
            get(favorite::favorites_by_buyer),
        )
        .route(
            "/favorites/buyer/username/:username",
            get(favorite::favorites_by_username),
        )
        // Subscriptions
        .route(
            "/subscriptions",
            get(subscription::list_subscriptions).post(subscription::create_subscription),
        )
        .route(
            "/subscriptions/:id",
            get(subscription::get_subscription)
                .put(subscription::update_subscription)
                .delete(subscription::delete_subscription),
        )
        .route(
            "/subscriptions/seller/:seller_id",
            get(subscription::subscriptions_by_seller),
        )
        .with_state(state)
}
