//! SeaORM implementation of FavoriteRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::constraints;
use crate::domain::{DomainError, Favorite, FavoriteCreate, FavoriteRepository, Pagination};
use crate::models::favorite::{self, ActiveModel, Column, Entity as FavoriteEntity};
use crate::models::{buyer, product, user};

/// SeaORM-based implementation of FavoriteRepository
pub struct SeaOrmFavoriteRepository {
    db: DatabaseConnection,
}

impl SeaOrmFavoriteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: favorite::Model) -> Favorite {
        Favorite {
            id: model.id,
            buyer_id: model.buyer_id,
            product_id: model.product_id,
        }
    }
}

#[async_trait]
impl FavoriteRepository for SeaOrmFavoriteRepository {
    async fn create(&self, input: FavoriteCreate) -> Result<Favorite, DomainError> {
        let FavoriteCreate {
            buyer_id,
            product_id,
        } = input;

        if buyer::Entity::find_by_id(buyer_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::BuyerNotFound(buyer_id));
        }
        if product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::ProductNotFound(product_id));
        }

        let duplicate = || DomainError::FavoriteAlreadyExists {
            buyer_id,
            product_id,
        };
        let existing = FavoriteEntity::find()
            .filter(Column::BuyerId.eq(buyer_id))
            .filter(Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(duplicate());
        }

        let model = ActiveModel {
            buyer_id: Set(buyer_id),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| constraints::on_write(e, |_| duplicate()))?;

        tracing::info!(
            "Buyer {} favorited product {} (favorite {})",
            buyer_id,
            product_id,
            model.id
        );
        Ok(Self::to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Favorite, DomainError> {
        FavoriteEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::to_domain)
            .ok_or(DomainError::FavoriteNotFound(id))
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<Favorite>, DomainError> {
        let models = FavoriteEntity::find()
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::to_domain).collect())
    }

    async fn find_by_buyer(&self, buyer_id: i32) -> Result<Vec<Favorite>, DomainError> {
        let models = FavoriteEntity::find()
            .filter(Column::BuyerId.eq(buyer_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        if models.is_empty() {
            return Err(DomainError::NoFavoritesFound(buyer_id.to_string()));
        }
        Ok(models.into_iter().map(Self::to_domain).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Vec<Favorite>, DomainError> {
        let models = FavoriteEntity::find()
            .join(JoinType::InnerJoin, favorite::Relation::Buyer.def())
            .join(JoinType::InnerJoin, buyer::Relation::User.def())
            .filter(user::Column::Username.eq(username))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        if models.is_empty() {
            return Err(DomainError::NoFavoritesFound(format!("'{}'", username)));
        }
        Ok(models.into_iter().map(Self::to_domain).collect())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = FavoriteEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::FavoriteNotFound(id));
        }
        Ok(())
    }
}
