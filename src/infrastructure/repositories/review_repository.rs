//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use super::constraints;
use crate::domain::{DomainError, NewReview, Pagination, Review, ReviewChanges, ReviewRepository};
use crate::models::review::{self, ActiveModel, Column, Entity as ReviewEntity};

/// SeaORM-based implementation of ReviewRepository
pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: review::Model) -> Review {
        Review {
            id: model.id,
            rating: model.rating,
            comment: model.comment,
            reviewer_id: model.reviewer_id,
            reviewed_user_id: model.reviewed_user_id,
            product_id: model.product_id,
        }
    }

    async fn page(
        &self,
        query: Select<ReviewEntity>,
        page: Pagination,
    ) -> Result<Vec<Review>, DomainError> {
        let models = query
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::to_domain).collect())
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn create(&self, input: NewReview) -> Result<Review, DomainError> {
        let duplicate = || DomainError::ReviewAlreadyExists {
            reviewer_id: input.reviewer_id,
            reviewed_user_id: input.reviewed_user_id,
            product_id: input.product_id,
        };

        // NULL never equals NULL in a unique index, so a review without a
        // product is only deduplicated here.
        let product_filter = match input.product_id {
            Some(product_id) => Column::ProductId.eq(product_id),
            None => Column::ProductId.is_null(),
        };
        let existing = ReviewEntity::find()
            .filter(Column::ReviewerId.eq(input.reviewer_id))
            .filter(Column::ReviewedUserId.eq(input.reviewed_user_id))
            .filter(product_filter)
            .one(&self.db)
            .await?;
        if existing.is_some() {
            tracing::warn!(
                "User {} already reviewed user {}",
                input.reviewer_id,
                input.reviewed_user_id
            );
            return Err(duplicate());
        }

        let model = ActiveModel {
            rating: Set(input.rating),
            comment: Set(input.comment.clone()),
            reviewer_id: Set(input.reviewer_id),
            reviewed_user_id: Set(input.reviewed_user_id),
            product_id: Set(input.product_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match constraints::on_write(e, |_| duplicate()) {
            DomainError::InvalidReference(_) => DomainError::InvalidReference(format!(
                "reviewer {}, reviewed user {} or product {:?} does not exist",
                input.reviewer_id, input.reviewed_user_id, input.product_id
            )),
            other => other,
        })?;

        tracing::info!("Created review {}", model.id);
        Ok(Self::to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Review, DomainError> {
        ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::to_domain)
            .ok_or(DomainError::ReviewNotFound(id))
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<Review>, DomainError> {
        self.page(ReviewEntity::find(), page).await
    }

    async fn find_by_product(
        &self,
        product_id: i32,
        page: Pagination,
    ) -> Result<Vec<Review>, DomainError> {
        self.page(
            ReviewEntity::find().filter(Column::ProductId.eq(product_id)),
            page,
        )
        .await
    }

    async fn find_by_reviewed_user(
        &self,
        user_id: i32,
        page: Pagination,
    ) -> Result<Vec<Review>, DomainError> {
        self.page(
            ReviewEntity::find().filter(Column::ReviewedUserId.eq(user_id)),
            page,
        )
        .await
    }

    async fn update(&self, id: i32, changes: ReviewChanges) -> Result<Review, DomainError> {
        let existing = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::ReviewNotFound(id))?;
        if changes.is_empty() {
            return Ok(Self::to_domain(existing));
        }

        let mut active: ActiveModel = existing.into();
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(comment) = changes.comment {
            active.comment = Set(comment);
        }

        let model = active.update(&self.db).await?;
        Ok(Self::to_domain(model))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ReviewEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::ReviewNotFound(id));
        }
        tracing::info!("Deleted review {}", id);
        Ok(())
    }
}
