//! User identity and the buyer/seller split.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::{DomainError, validation};
use crate::models::{SubscriptionLevel, UserType};

/// User as returned by the API. The password hash never leaves storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

/// Subtype-specific part of a user, tagged by `user_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "lowercase")]
pub enum UserProfile {
    Buyer,
    Seller { subscription_level: SubscriptionLevel },
}

impl UserProfile {
    pub fn user_type(&self) -> UserType {
        match self {
            UserProfile::Buyer => UserType::Buyer,
            UserProfile::Seller { .. } => UserType::Seller,
        }
    }
}

/// Payload for `POST /users`.
///
/// `user_type` stays a plain string here so an unknown discriminator is
/// reported as an invalid user type rather than a generic decoding failure.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// `buyer` or `seller`
    pub user_type: String,
}

/// Validated user creation input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
}

impl UserCreate {
    pub fn validate(self) -> Result<NewUser, DomainError> {
        let user_type = self
            .user_type
            .trim()
            .parse::<UserType>()
            .map_err(DomainError::InvalidUserType)?;

        Ok(NewUser {
            username: validation::username(&self.username)?,
            email: validation::email(&self.email)?,
            password_hash: validation::bounded("password_hash", &self.password_hash, 1, 255)?,
            user_type,
        })
    }
}

/// Payload for `PUT /users/:id`. The user type cannot change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

impl UserUpdate {
    pub fn validate(self) -> Result<UserChanges, DomainError> {
        Ok(UserChanges {
            username: self.username.as_deref().map(validation::username).transpose()?,
            email: self.email.as_deref().map(validation::email).transpose()?,
            password_hash: self
                .password_hash
                .as_deref()
                .map(|h| validation::bounded("password_hash", h, 1, 255))
                .transpose()?,
        })
    }
}

/// Which column a user lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Id,
    Username,
    Email,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Id => write!(f, "id"),
            IdentifierKind::Username => write!(f, "username"),
            IdentifierKind::Email => write!(f, "email"),
        }
    }
}

impl FromStr for IdentifierKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(IdentifierKind::Id),
            "username" => Ok(IdentifierKind::Username),
            "email" => Ok(IdentifierKind::Email),
            other => Err(DomainError::InvalidIdentifierKind(other.to_string())),
        }
    }
}

/// A user lookup key with its value already typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentifier {
    Id(i32),
    Username(String),
    Email(String),
}

impl UserIdentifier {
    /// Build an identifier from the free-form pair used by the generic lookup route.
    pub fn parse(kind: &str, value: &str) -> Result<Self, DomainError> {
        match kind.parse::<IdentifierKind>()? {
            IdentifierKind::Id => value
                .parse()
                .map(UserIdentifier::Id)
                .map_err(|_| DomainError::InvalidIdentifier(value.to_string())),
            IdentifierKind::Username => Ok(UserIdentifier::Username(value.to_string())),
            IdentifierKind::Email => Ok(UserIdentifier::Email(value.to_string())),
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            UserIdentifier::Id(_) => IdentifierKind::Id,
            UserIdentifier::Username(_) => IdentifierKind::Username,
            UserIdentifier::Email(_) => IdentifierKind::Email,
        }
    }

    pub fn not_found(&self) -> DomainError {
        DomainError::user_not_found(self, self.kind())
    }
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserIdentifier::Id(id) => write!(f, "{}", id),
            UserIdentifier::Username(value) | UserIdentifier::Email(value) => {
                write!(f, "{}", value)
            }
        }
    }
}
