//! SeaORM implementations of the domain repository traits

mod constraints;
pub mod favorite_repository;
pub mod product_repository;
pub mod review_repository;
pub mod subscription_repository;
pub mod tag_repository;
pub mod user_repository;

pub use favorite_repository::SeaOrmFavoriteRepository;
pub use product_repository::SeaOrmProductRepository;
pub use review_repository::SeaOrmReviewRepository;
pub use subscription_repository::SeaOrmSubscriptionRepository;
pub use tag_repository::SeaOrmTagRepository;
pub use user_repository::SeaOrmUserRepository;
