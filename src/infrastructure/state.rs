//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    FavoriteRepository, ProductRepository, ReviewRepository, SubscriptionRepository,
    TagRepository, UserRepository,
};
use crate::infrastructure::{
    SeaOrmFavoriteRepository, SeaOrmProductRepository, SeaOrmReviewRepository,
    SeaOrmSubscriptionRepository, SeaOrmTagRepository, SeaOrmUserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub tag_repo: Arc<dyn TagRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub favorite_repo: Arc<dyn FavoriteRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories sharing one pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(SeaOrmUserRepository::new(db.clone())),
            product_repo: Arc::new(SeaOrmProductRepository::new(db.clone())),
            tag_repo: Arc::new(SeaOrmTagRepository::new(db.clone())),
            review_repo: Arc::new(SeaOrmReviewRepository::new(db.clone())),
            favorite_repo: Arc::new(SeaOrmFavoriteRepository::new(db.clone())),
            subscription_repo: Arc::new(SeaOrmSubscriptionRepository::new(db)),
        }
    }
}
