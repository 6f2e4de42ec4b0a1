//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Each variant carries what its message needs; the HTTP layer only looks at
//! [`DomainError::kind`] when picking a status code.

use std::fmt;

use super::user::IdentifierKind;

#[derive(Debug)]
pub enum DomainError {
    /// No user matches the identifier
    UserNotFound {
        identifier: String,
        kind: IdentifierKind,
    },
    /// Username or email already taken
    UserAlreadyExists {
        identifier: String,
        kind: IdentifierKind,
    },
    /// Discriminator outside `buyer`/`seller`
    InvalidUserType(String),
    /// Identifier kind outside `id`/`username`/`email`
    InvalidIdentifierKind(String),
    /// Identifier that cannot be read as its kind (non-numeric id)
    InvalidIdentifier(String),
    SellerNotFound(i32),
    BuyerNotFound(i32),
    ProductNotFound(i32),
    ProductAlreadyExists(String),
    NoProductsFound(i32),
    ProductImageNotFound(i32),
    TagNotFound(String),
    TagAlreadyExists(String),
    ReviewNotFound(i32),
    ReviewAlreadyExists {
        reviewer_id: i32,
        reviewed_user_id: i32,
        product_id: Option<i32>,
    },
    FavoriteNotFound(i32),
    FavoriteAlreadyExists {
        buyer_id: i32,
        product_id: i32,
    },
    NoFavoritesFound(String),
    SubscriptionNotFound(i32),
    /// Insert or update pointed a foreign key at a missing row
    InvalidReference(String),
    /// Delete refused because other rows still point at the target
    StillReferenced(String),
    /// Payload failed field constraints
    Validation(String),
    /// Database/persistence error
    Database(String),
}

/// Payload-free tag of a [`DomainError`], used as the key of status tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserNotFound,
    UserAlreadyExists,
    InvalidUserType,
    InvalidIdentifierKind,
    InvalidIdentifier,
    SellerNotFound,
    BuyerNotFound,
    ProductNotFound,
    ProductAlreadyExists,
    NoProductsFound,
    ProductImageNotFound,
    TagNotFound,
    TagAlreadyExists,
    ReviewNotFound,
    ReviewAlreadyExists,
    FavoriteNotFound,
    FavoriteAlreadyExists,
    NoFavoritesFound,
    SubscriptionNotFound,
    InvalidReference,
    StillReferenced,
    Validation,
    Database,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::UserNotFound { .. } => ErrorKind::UserNotFound,
            DomainError::UserAlreadyExists { .. } => ErrorKind::UserAlreadyExists,
            DomainError::InvalidUserType(_) => ErrorKind::InvalidUserType,
            DomainError::InvalidIdentifierKind(_) => ErrorKind::InvalidIdentifierKind,
            DomainError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            DomainError::SellerNotFound(_) => ErrorKind::SellerNotFound,
            DomainError::BuyerNotFound(_) => ErrorKind::BuyerNotFound,
            DomainError::ProductNotFound(_) => ErrorKind::ProductNotFound,
            DomainError::ProductAlreadyExists(_) => ErrorKind::ProductAlreadyExists,
            DomainError::NoProductsFound(_) => ErrorKind::NoProductsFound,
            DomainError::ProductImageNotFound(_) => ErrorKind::ProductImageNotFound,
            DomainError::TagNotFound(_) => ErrorKind::TagNotFound,
            DomainError::TagAlreadyExists(_) => ErrorKind::TagAlreadyExists,
            DomainError::ReviewNotFound(_) => ErrorKind::ReviewNotFound,
            DomainError::ReviewAlreadyExists { .. } => ErrorKind::ReviewAlreadyExists,
            DomainError::FavoriteNotFound(_) => ErrorKind::FavoriteNotFound,
            DomainError::FavoriteAlreadyExists { .. } => ErrorKind::FavoriteAlreadyExists,
            DomainError::NoFavoritesFound(_) => ErrorKind::NoFavoritesFound,
            DomainError::SubscriptionNotFound(_) => ErrorKind::SubscriptionNotFound,
            DomainError::InvalidReference(_) => ErrorKind::InvalidReference,
            DomainError::StillReferenced(_) => ErrorKind::StillReferenced,
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Database(_) => ErrorKind::Database,
        }
    }

    pub fn user_not_found(identifier: impl ToString, kind: IdentifierKind) -> Self {
        DomainError::UserNotFound {
            identifier: identifier.to_string(),
            kind,
        }
    }

    pub fn user_exists(identifier: impl ToString, kind: IdentifierKind) -> Self {
        DomainError::UserAlreadyExists {
            identifier: identifier.to_string(),
            kind,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::UserNotFound { identifier, kind } => {
                write!(f, "User with {} '{}' does not exist", kind, identifier)
            }
            DomainError::UserAlreadyExists { identifier, kind } => {
                write!(f, "User with {} '{}' already exists", kind, identifier)
            }
            DomainError::InvalidUserType(t) => write!(f, "Invalid user type '{}'", t),
            DomainError::InvalidIdentifierKind(k) => {
                write!(f, "Invalid identifier type '{}'", k)
            }
            DomainError::InvalidIdentifier(i) => write!(f, "Invalid identifier '{}'", i),
            DomainError::SellerNotFound(id) => write!(f, "Seller with ID {} does not exist", id),
            DomainError::BuyerNotFound(id) => write!(f, "Buyer with ID {} does not exist", id),
            DomainError::ProductNotFound(id) => {
                write!(f, "Product with ID {} does not exist", id)
            }
            DomainError::ProductAlreadyExists(name) => {
                write!(f, "Product with name '{}' already exists", name)
            }
            DomainError::NoProductsFound(seller_id) => {
                write!(f, "No products found for seller with ID {}", seller_id)
            }
            DomainError::ProductImageNotFound(id) => {
                write!(f, "Product image with ID {} does not exist", id)
            }
            DomainError::TagNotFound(tag) => write!(f, "Tag {} not found", tag),
            DomainError::TagAlreadyExists(name) => {
                write!(f, "A tag with the name '{}' already exists", name)
            }
            DomainError::ReviewNotFound(id) => write!(f, "Review with ID {} not found", id),
            DomainError::ReviewAlreadyExists {
                reviewer_id,
                reviewed_user_id,
                product_id,
            } => match product_id {
                Some(product_id) => write!(
                    f,
                    "User {} already reviewed user {} for product {}",
                    reviewer_id, reviewed_user_id, product_id
                ),
                None => write!(
                    f,
                    "User {} already reviewed user {}",
                    reviewer_id, reviewed_user_id
                ),
            },
            DomainError::FavoriteNotFound(id) => write!(f, "Favorite with ID {} not found", id),
            DomainError::FavoriteAlreadyExists {
                buyer_id,
                product_id,
            } => write!(
                f,
                "Favorite already exists for user {} on product {}",
                buyer_id, product_id
            ),
            DomainError::NoFavoritesFound(buyer) => {
                write!(f, "No favorites found for buyer {}", buyer)
            }
            DomainError::SubscriptionNotFound(id) => {
                write!(f, "Subscription with ID {} not found", id)
            }
            DomainError::InvalidReference(msg) => write!(f, "Invalid reference: {}", msg),
            DomainError::StillReferenced(msg) => write!(f, "Still referenced: {}", msg),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

// Writes run inside `TransactionTrait::transaction`, which wraps the closure's error
impl From<sea_orm::TransactionError<DomainError>> for DomainError {
    fn from(e: sea_orm::TransactionError<DomainError>) -> Self {
        match e {
            sea_orm::TransactionError::Connection(db) => db.into(),
            sea_orm::TransactionError::Transaction(err) => err,
        }
    }
}
