//! SeaORM implementation of SubscriptionRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::constraints;
use crate::domain::{
    DomainError, NewSubscription, Pagination, Subscription, SubscriptionChanges,
    SubscriptionRepository, date_range,
};
use crate::models::seller;
use crate::models::subscription::{self, ActiveModel, Column, Entity as SubscriptionEntity};

/// SeaORM-based implementation of SubscriptionRepository
pub struct SeaOrmSubscriptionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: subscription::Model) -> Subscription {
        Subscription {
            id: model.id,
            seller_id: model.seller_id,
            subscription_level: model.subscription_level,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }

    async fn ensure_seller(&self, seller_id: i32) -> Result<(), DomainError> {
        match seller::Entity::find_by_id(seller_id).one(&self.db).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::SellerNotFound(seller_id)),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, input: NewSubscription) -> Result<Subscription, DomainError> {
        self.ensure_seller(input.seller_id).await?;

        let model = ActiveModel {
            seller_id: Set(input.seller_id),
            subscription_level: Set(input.subscription_level),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            constraints::on_write(e, |msg| DomainError::Validation(msg.to_string()))
        })?;

        tracing::info!(
            "Created {} subscription {} for seller {}",
            model.subscription_level,
            model.id,
            model.seller_id
        );
        Ok(Self::to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Subscription, DomainError> {
        SubscriptionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::to_domain)
            .ok_or(DomainError::SubscriptionNotFound(id))
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<Subscription>, DomainError> {
        let models = SubscriptionEntity::find()
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::to_domain).collect())
    }

    async fn find_by_seller(
        &self,
        seller_id: i32,
        page: Pagination,
    ) -> Result<Vec<Subscription>, DomainError> {
        let models = SubscriptionEntity::find()
            .filter(Column::SellerId.eq(seller_id))
            .order_by_asc(Column::StartDate)
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::to_domain).collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, DomainError> {
        let existing = SubscriptionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::SubscriptionNotFound(id))?;
        if changes.is_empty() {
            return Ok(Self::to_domain(existing));
        }

        // The range is checked on the merged dates, not just the supplied ones.
        date_range(
            changes.start_date.unwrap_or(existing.start_date),
            changes.end_date.unwrap_or(existing.end_date),
        )?;

        let mut active: ActiveModel = existing.into();
        if let Some(level) = changes.subscription_level {
            active.subscription_level = Set(level);
        }
        if let Some(start) = changes.start_date {
            active.start_date = Set(start);
        }
        if let Some(end) = changes.end_date {
            active.end_date = Set(end);
        }

        let model = active.update(&self.db).await?;
        Ok(Self::to_domain(model))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = SubscriptionEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::SubscriptionNotFound(id));
        }
        Ok(())
    }
}
