//! SeaORM implementation of TagRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::constraints;
use crate::domain::{DomainError, Pagination, Tag, TagRepository};
use crate::models::tag::{self, ActiveModel, Column, Entity as TagEntity};

/// SeaORM-based implementation of TagRepository
pub struct SeaOrmTagRepository {
    db: DatabaseConnection,
}

impl SeaOrmTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: tag::Model) -> Tag {
        Tag {
            id: model.id,
            name: model.name,
        }
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<i32>) -> Result<(), DomainError> {
        let mut query = TagEntity::find().filter(Column::Name.eq(name));
        if let Some(id) = except_id {
            query = query.filter(Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(DomainError::TagAlreadyExists(name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn create(&self, name: String) -> Result<Tag, DomainError> {
        self.ensure_name_free(&name, None).await?;

        let model = ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| constraints::on_write(e, |_| DomainError::TagAlreadyExists(name)))?;

        tracing::info!("Created tag '{}' (id {})", model.name, model.id);
        Ok(Self::to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Tag, DomainError> {
        TagEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Self::to_domain)
            .ok_or_else(|| DomainError::TagNotFound(format!("with ID {}", id)))
    }

    async fn find_by_name(&self, name: &str) -> Result<Tag, DomainError> {
        TagEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(Self::to_domain)
            .ok_or_else(|| DomainError::TagNotFound(format!("with name '{}'", name)))
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<Tag>, DomainError> {
        let models = TagEntity::find()
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::to_domain).collect())
    }

    async fn rename(&self, id: i32, name: Option<String>) -> Result<Tag, DomainError> {
        let existing = TagEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::TagNotFound(format!("with ID {}", id)))?;

        let Some(name) = name else {
            return Ok(Self::to_domain(existing));
        };
        self.ensure_name_free(&name, Some(id)).await?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name.clone());
        let model = active
            .update(&self.db)
            .await
            .map_err(|e| constraints::on_write(e, |_| DomainError::TagAlreadyExists(name)))?;

        Ok(Self::to_domain(model))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = TagEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::TagNotFound(format!("with ID {}", id)));
        }
        tracing::info!("Deleted tag {}", id);
        Ok(())
    }
}
