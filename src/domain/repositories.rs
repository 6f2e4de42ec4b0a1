//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.
//!
//! Single-row lookups fail with the entity's not-found error instead of
//! returning `None`; list lookups return an empty `Vec`.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::IntoParams;

use super::DomainError;
use super::favorite::{Favorite, FavoriteCreate};
use super::product::{NewProduct, Product, ProductChanges, ProductImage};
use super::review::{NewReview, Review, ReviewChanges};
use super::subscription::{NewSubscription, Subscription, SubscriptionChanges};
use super::tag::Tag;
use super::user::{NewUser, User, UserChanges, UserIdentifier};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

/// `?skip=&limit=` window over a listing, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Records to skip
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of records returned
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Largest value the storage driver binds as a signed 64-bit integer.
const MAX_WINDOW: u64 = i64::MAX as u64;

impl Pagination {
    /// Rows to skip, clamped to what the driver can bind.
    pub fn offset(&self) -> u64 {
        self.skip.min(MAX_WINDOW)
    }

    /// Rows to return, clamped to what the driver can bind.
    pub fn max_rows(&self) -> u64 {
        self.limit.min(MAX_WINDOW)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Repository trait for users and their buyer/seller side rows
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the base row and the matching side row
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Find a user by id, username or email
    async fn find(&self, identifier: &UserIdentifier) -> Result<User, DomainError>;

    async fn find_all(&self, page: Pagination) -> Result<Vec<User>, DomainError>;

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for products, their images and tag links
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Product, DomainError>;

    async fn find_all(&self, page: Pagination) -> Result<Vec<Product>, DomainError>;

    /// Products of one seller; an empty page is `NoProductsFound`
    async fn find_by_seller(
        &self,
        seller_id: i32,
        page: Pagination,
    ) -> Result<Vec<Product>, DomainError>;

    async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn add_image(&self, product_id: i32, image_url: String)
    -> Result<ProductImage, DomainError>;

    async fn find_image(&self, image_id: i32) -> Result<ProductImage, DomainError>;

    async fn images_for(&self, product_id: i32) -> Result<Vec<ProductImage>, DomainError>;

    async fn delete_image(&self, image_id: i32) -> Result<(), DomainError>;

    /// Link a tag; linking twice is a no-op
    async fn attach_tag(&self, product_id: i32, tag_id: i32) -> Result<Vec<Tag>, DomainError>;

    async fn detach_tag(&self, product_id: i32, tag_id: i32) -> Result<(), DomainError>;

    async fn tags_for(&self, product_id: i32) -> Result<Vec<Tag>, DomainError>;
}

/// Repository trait for Tag entity
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, name: String) -> Result<Tag, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Tag, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Tag, DomainError>;

    async fn find_all(&self, page: Pagination) -> Result<Vec<Tag>, DomainError>;

    async fn rename(&self, id: i32, name: Option<String>) -> Result<Tag, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Review entity
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: NewReview) -> Result<Review, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Review, DomainError>;

    async fn find_all(&self, page: Pagination) -> Result<Vec<Review>, DomainError>;

    async fn find_by_product(
        &self,
        product_id: i32,
        page: Pagination,
    ) -> Result<Vec<Review>, DomainError>;

    async fn find_by_reviewed_user(
        &self,
        user_id: i32,
        page: Pagination,
    ) -> Result<Vec<Review>, DomainError>;

    async fn update(&self, id: i32, changes: ReviewChanges) -> Result<Review, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Favorite entity
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn create(&self, favorite: FavoriteCreate) -> Result<Favorite, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Favorite, DomainError>;

    async fn find_all(&self, page: Pagination) -> Result<Vec<Favorite>, DomainError>;

    /// Favorites of one buyer; none at all is `NoFavoritesFound`
    async fn find_by_buyer(&self, buyer_id: i32) -> Result<Vec<Favorite>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Vec<Favorite>, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Subscription entity
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: NewSubscription) -> Result<Subscription, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Subscription, DomainError>;

    async fn find_all(&self, page: Pagination) -> Result<Vec<Subscription>, DomainError>;

    async fn find_by_seller(
        &self,
        seller_id: i32,
        page: Pagination,
    ) -> Result<Vec<Subscription>, DomainError>;

    async fn update(
        &self,
        id: i32,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
