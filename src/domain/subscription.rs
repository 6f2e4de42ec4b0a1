use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;
use crate::models::SubscriptionLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    pub id: i32,
    pub seller_id: i32,
    pub subscription_level: SubscriptionLevel,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Payload for `POST /subscriptions`. Overlapping ranges are allowed.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubscriptionCreate {
    pub seller_id: i32,
    /// `basic`, `premium` or `pro`
    pub subscription_level: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub seller_id: i32,
    pub subscription_level: SubscriptionLevel,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn subscription_level(value: &str) -> Result<SubscriptionLevel, DomainError> {
    value.trim().parse().map_err(|level| {
        DomainError::Validation(format!(
            "invalid subscription level '{}', expected basic, premium or pro",
            level
        ))
    })
}

pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<(), DomainError> {
    if start > end {
        return Err(DomainError::Validation(format!(
            "start_date {} is after end_date {}",
            start, end
        )));
    }
    Ok(())
}

impl SubscriptionCreate {
    pub fn validate(self) -> Result<NewSubscription, DomainError> {
        date_range(self.start_date, self.end_date)?;
        Ok(NewSubscription {
            seller_id: self.seller_id,
            subscription_level: subscription_level(&self.subscription_level)?,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Payload for `PUT /subscriptions/:id`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubscriptionUpdate {
    pub subscription_level: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionChanges {
    pub subscription_level: Option<SubscriptionLevel>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SubscriptionChanges {
    pub fn is_empty(&self) -> bool {
        self.subscription_level.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

impl SubscriptionUpdate {
    /// Date order is checked again by the repository against the stored row.
    pub fn validate(self) -> Result<SubscriptionChanges, DomainError> {
        Ok(SubscriptionChanges {
            subscription_level: self
                .subscription_level
                .as_deref()
                .map(subscription_level)
                .transpose()?,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[test]
    fn reversed_range_is_rejected() {
        let payload = SubscriptionCreate {
            seller_id: 1,
            subscription_level: "pro".into(),
            start_date: day(10),
            end_date: day(1),
        };
        assert!(matches!(payload.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let payload = SubscriptionCreate {
            seller_id: 1,
            subscription_level: "gold".into(),
            start_date: day(1),
            end_date: day(10),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn single_day_range_is_fine() {
        assert!(date_range(day(5), day(5)).is_ok());
    }
}
