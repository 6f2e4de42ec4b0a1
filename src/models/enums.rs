//! Enumerated column types shared by several tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Discriminator stored on `users.user_type`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[sea_orm(string_value = "buyer")]
    Buyer,
    #[sea_orm(string_value = "seller")]
    Seller,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Buyer => write!(f, "buyer"),
            UserType::Seller => write!(f, "seller"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(UserType::Buyer),
            "seller" => Ok(UserType::Seller),
            other => Err(other.to_string()),
        }
    }
}

/// Seller tier. New sellers start at `Basic`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionLevel {
    #[default]
    #[sea_orm(string_value = "basic")]
    Basic,
    #[sea_orm(string_value = "premium")]
    Premium,
    #[sea_orm(string_value = "pro")]
    Pro,
}

impl fmt::Display for SubscriptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionLevel::Basic => write!(f, "basic"),
            SubscriptionLevel::Premium => write!(f, "premium"),
            SubscriptionLevel::Pro => write!(f, "pro"),
        }
    }
}

impl FromStr for SubscriptionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(SubscriptionLevel::Basic),
            "premium" => Ok(SubscriptionLevel::Premium),
            "pro" => Ok(SubscriptionLevel::Pro),
            other => Err(other.to_string()),
        }
    }
}

/// Review score, 1 to 5. Travels as a bare integer in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    #[sea_orm(num_value = 1)]
    One,
    #[sea_orm(num_value = 2)]
    Two,
    #[sea_orm(num_value = 3)]
    Three,
    #[sea_orm(num_value = 4)]
    Four,
    #[sea_orm(num_value = 5)]
    Five,
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::One),
            2 => Ok(Rating::Two),
            3 => Ok(Rating::Three),
            4 => Ok(Rating::Four),
            5 => Ok(Rating::Five),
            other => Err(format!("rating must be between 1 and 5, got {}", other)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::One => 1,
            Rating::Two => 2,
            Rating::Three => 3,
            Rating::Four => 4,
            Rating::Five => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_round_trips_as_integer() {
        let json = serde_json::to_string(&Rating::Four).unwrap();
        assert_eq!(json, "4");
        let parsed: Rating = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Rating::Two);
        assert!(serde_json::from_str::<Rating>("6").is_err());
        assert!(serde_json::from_str::<Rating>("0").is_err());
    }

    #[test]
    fn user_type_parses_lowercase_only() {
        assert_eq!("seller".parse::<UserType>(), Ok(UserType::Seller));
        assert_eq!("Admin".parse::<UserType>(), Err("Admin".to_string()));
    }

    #[test]
    fn subscription_level_defaults_to_basic() {
        assert_eq!(SubscriptionLevel::default(), SubscriptionLevel::Basic);
        assert_eq!("pro".parse::<SubscriptionLevel>(), Ok(SubscriptionLevel::Pro));
    }
}
