//! SeaORM implementation of ProductRepository
//!
//! Products are always returned hydrated with their images and tags. Both are
//! loaded with one `IN (...)` query each, whatever the page size.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::constraints;
use crate::domain::{
    DomainError, NewProduct, Pagination, Product, ProductChanges, ProductImage,
    ProductRepository, Tag,
};
use crate::models::product::{self, ActiveModel, Column, Entity as ProductEntity};
use crate::models::{product_image, product_tag, review, seller, tag};

/// SeaORM-based implementation of ProductRepository
pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn image_to_domain(model: product_image::Model) -> ProductImage {
    ProductImage {
        id: model.id,
        image_url: model.image_url,
        product_id: model.product_id,
    }
}

fn tag_to_domain(model: tag::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
    }
}

/// Reviews of a deleted product lose their product. Refuse when that would
/// leave two product-less reviews for the same reviewer and reviewed user.
async fn ensure_reviews_detachable<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
) -> Result<(), DomainError> {
    let attached = review::Entity::find()
        .filter(review::Column::ProductId.eq(product_id))
        .all(db)
        .await?;

    for row in attached {
        let clash = review::Entity::find()
            .filter(review::Column::ReviewerId.eq(row.reviewer_id))
            .filter(review::Column::ReviewedUserId.eq(row.reviewed_user_id))
            .filter(review::Column::ProductId.is_null())
            .one(db)
            .await?;
        if let Some(clash) = clash {
            tracing::warn!(
                "Refusing to delete product {}: review {} would duplicate review {}",
                product_id,
                row.id,
                clash.id
            );
            return Err(DomainError::StillReferenced(format!(
                "product {} has review {} that would duplicate review {}",
                product_id, row.id, clash.id
            )));
        }
    }
    Ok(())
}

/// Attach images and tags to a batch of product rows, preserving their order.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    products: Vec<product::Model>,
) -> Result<Vec<Product>, DomainError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();

    let mut images: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for image in product_image::Entity::find()
        .filter(product_image::Column::ProductId.is_in(ids.clone()))
        .order_by_asc(product_image::Column::Id)
        .all(db)
        .await?
    {
        images
            .entry(image.product_id)
            .or_default()
            .push(image_to_domain(image));
    }

    let mut tags: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (link, tag) in product_tag::Entity::find()
        .filter(product_tag::Column::ProductId.is_in(ids))
        .find_also_related(tag::Entity)
        .order_by_asc(product_tag::Column::TagId)
        .all(db)
        .await?
    {
        if let Some(tag) = tag {
            tags.entry(link.product_id)
                .or_default()
                .push(tag_to_domain(tag));
        }
    }

    Ok(products
        .into_iter()
        .map(|p| Product {
            images: images.remove(&p.id).unwrap_or_default(),
            tags: tags.remove(&p.id).unwrap_or_default(),
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            seller_id: p.seller_id,
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    db: &C,
    product: product::Model,
) -> Result<Product, DomainError> {
    let id = product.id;
    hydrate(db, vec![product])
        .await?
        .pop()
        .ok_or(DomainError::ProductNotFound(id))
}

async fn find_row<C: ConnectionTrait>(db: &C, id: i32) -> Result<product::Model, DomainError> {
    ProductEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::ProductNotFound(id))
}

async fn ensure_seller<C: ConnectionTrait>(db: &C, seller_id: i32) -> Result<(), DomainError> {
    match seller::Entity::find_by_id(seller_id).one(db).await? {
        Some(_) => Ok(()),
        None => {
            tracing::warn!("Seller {} not found", seller_id);
            Err(DomainError::SellerNotFound(seller_id))
        }
    }
}

async fn ensure_tag<C: ConnectionTrait>(db: &C, tag_id: i32) -> Result<(), DomainError> {
    match tag::Entity::find_by_id(tag_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::TagNotFound(format!("with ID {}", tag_id))),
    }
}

/// Fail with `ProductAlreadyExists` if another product already uses `name`.
async fn ensure_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except_id: Option<i32>,
) -> Result<(), DomainError> {
    let mut query = ProductEntity::find().filter(Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        tracing::warn!("Product name '{}' already taken", name);
        return Err(DomainError::ProductAlreadyExists(name.to_string()));
    }
    Ok(())
}

/// Insert the link unless it exists already.
async fn link_tag<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
    tag_id: i32,
) -> Result<(), DomainError> {
    ensure_tag(db, tag_id).await?;

    product_tag::Entity::insert(product_tag::ActiveModel {
        product_id: Set(product_id),
        tag_id: Set(tag_id),
    })
    .on_conflict(
        OnConflict::columns([product_tag::Column::ProductId, product_tag::Column::TagId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await
    .map_err(|e| constraints::on_write(e, |msg| DomainError::InvalidReference(msg.to_string())))?;
    Ok(())
}

async fn tags_of<C: ConnectionTrait>(db: &C, product_id: i32) -> Result<Vec<Tag>, DomainError> {
    let rows = product_tag::Entity::find()
        .filter(product_tag::Column::ProductId.eq(product_id))
        .find_also_related(tag::Entity)
        .order_by_asc(product_tag::Column::TagId)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(_, tag)| tag.map(tag_to_domain))
        .collect())
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn create(&self, input: NewProduct) -> Result<Product, DomainError> {
        let product = self
            .db
            .transaction::<_, Product, DomainError>(|txn| {
                Box::pin(async move {
                    ensure_seller(txn, input.seller_id).await?;
                    ensure_name_free(txn, &input.name, None).await?;

                    let name = input.name.clone();
                    let row = ActiveModel {
                        name: Set(input.name),
                        description: Set(input.description),
                        price: Set(input.price),
                        seller_id: Set(input.seller_id),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| {
                        constraints::on_write(e, |_| DomainError::ProductAlreadyExists(name))
                    })?;

                    for tag_id in input.tag_ids {
                        link_tag(txn, row.id, tag_id).await?;
                    }

                    hydrate_one(txn, row).await
                })
            })
            .await?;

        tracing::info!("Created product '{}' (id {})", product.name, product.id);
        Ok(product)
    }

    async fn find_by_id(&self, id: i32) -> Result<Product, DomainError> {
        let row = find_row(&self.db, id).await?;
        hydrate_one(&self.db, row).await
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<Product>, DomainError> {
        let rows = ProductEntity::find()
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;
        hydrate(&self.db, rows).await
    }

    async fn find_by_seller(
        &self,
        seller_id: i32,
        page: Pagination,
    ) -> Result<Vec<Product>, DomainError> {
        let rows = ProductEntity::find()
            .filter(Column::SellerId.eq(seller_id))
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;

        if rows.is_empty() {
            return Err(DomainError::NoProductsFound(seller_id));
        }
        hydrate(&self.db, rows).await
    }

    async fn update(&self, id: i32, changes: ProductChanges) -> Result<Product, DomainError> {
        self.db
            .transaction::<_, Product, DomainError>(|txn| {
                Box::pin(async move {
                    let existing = find_row(txn, id).await?;
                    if changes.is_empty() {
                        return hydrate_one(txn, existing).await;
                    }

                    if let Some(seller_id) = changes.seller_id {
                        ensure_seller(txn, seller_id).await?;
                    }
                    if let Some(name) = changes.name.as_deref() {
                        ensure_name_free(txn, name, Some(id)).await?;
                    }

                    let name = changes
                        .name
                        .clone()
                        .unwrap_or_else(|| existing.name.clone());
                    let mut active: ActiveModel = existing.into();
                    if let Some(value) = changes.name {
                        active.name = Set(value);
                    }
                    if let Some(value) = changes.description {
                        active.description = Set(value);
                    }
                    if let Some(value) = changes.price {
                        active.price = Set(value);
                    }
                    if let Some(value) = changes.seller_id {
                        active.seller_id = Set(value);
                    }

                    let row = active.update(txn).await.map_err(|e| {
                        constraints::on_write(e, |_| DomainError::ProductAlreadyExists(name))
                    })?;
                    hydrate_one(txn, row).await
                })
            })
            .await
            .map_err(DomainError::from)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.db
            .transaction::<_, (), DomainError>(|txn| {
                Box::pin(async move {
                    find_row(txn, id).await?;
                    ensure_reviews_detachable(txn, id).await?;

                    ProductEntity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(|e| {
                            constraints::on_delete(e, || {
                                format!("product {} is still referenced", id)
                            })
                        })?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!("Deleted product {}", id);
        Ok(())
    }

    async fn add_image(
        &self,
        product_id: i32,
        image_url: String,
    ) -> Result<ProductImage, DomainError> {
        find_row(&self.db, product_id).await?;

        let image = product_image::ActiveModel {
            image_url: Set(image_url),
            product_id: Set(product_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!("Added image {} to product {}", image.id, product_id);
        Ok(image_to_domain(image))
    }

    async fn find_image(&self, image_id: i32) -> Result<ProductImage, DomainError> {
        product_image::Entity::find_by_id(image_id)
            .one(&self.db)
            .await?
            .map(image_to_domain)
            .ok_or(DomainError::ProductImageNotFound(image_id))
    }

    async fn images_for(&self, product_id: i32) -> Result<Vec<ProductImage>, DomainError> {
        find_row(&self.db, product_id).await?;

        let images = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_asc(product_image::Column::Id)
            .all(&self.db)
            .await?;
        Ok(images.into_iter().map(image_to_domain).collect())
    }

    async fn delete_image(&self, image_id: i32) -> Result<(), DomainError> {
        let result = product_image::Entity::delete_by_id(image_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::ProductImageNotFound(image_id));
        }
        Ok(())
    }

    async fn attach_tag(&self, product_id: i32, tag_id: i32) -> Result<Vec<Tag>, DomainError> {
        self.db
            .transaction::<_, Vec<Tag>, DomainError>(|txn| {
                Box::pin(async move {
                    find_row(txn, product_id).await?;
                    link_tag(txn, product_id, tag_id).await?;
                    tags_of(txn, product_id).await
                })
            })
            .await
            .map_err(DomainError::from)
    }

    async fn detach_tag(&self, product_id: i32, tag_id: i32) -> Result<(), DomainError> {
        find_row(&self.db, product_id).await?;

        let result = product_tag::Entity::delete_by_id((product_id, tag_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::TagNotFound(format!(
                "{} on product {}",
                tag_id, product_id
            )));
        }
        Ok(())
    }

    async fn tags_for(&self, product_id: i32) -> Result<Vec<Tag>, DomainError> {
        find_row(&self.db, product_id).await?;
        tags_of(&self.db, product_id).await
    }
}
