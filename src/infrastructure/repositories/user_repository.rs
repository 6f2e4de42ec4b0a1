//! SeaORM implementation of UserRepository
//!
//! A user is a `users` row plus exactly one `buyers` or `sellers` row sharing
//! its id. Both rows are written and removed in one transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::constraints;
use crate::domain::{
    DomainError, IdentifierKind, NewUser, Pagination, User, UserChanges, UserIdentifier,
    UserProfile, UserRepository,
};
use crate::models::{SubscriptionLevel, UserType, buyer, seller};
use crate::models::user::{self, ActiveModel, Column, Entity as UserEntity};

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(user: user::Model, seller: Option<seller::Model>) -> User {
    let profile = match user.user_type {
        UserType::Buyer => UserProfile::Buyer,
        UserType::Seller => UserProfile::Seller {
            subscription_level: seller
                .map(|s| s.subscription_level)
                .unwrap_or_default(),
        },
    };

    User {
        id: user.id,
        username: user.username,
        email: user.email,
        profile,
    }
}

/// Fail with `UserAlreadyExists` if another user holds the username or email.
async fn ensure_available<C: ConnectionTrait>(
    db: &C,
    username: Option<&str>,
    email: Option<&str>,
    except_id: Option<i32>,
) -> Result<(), DomainError> {
    let taken = |column: Column, value: &str| {
        let mut query = UserEntity::find().filter(column.eq(value));
        if let Some(id) = except_id {
            query = query.filter(Column::Id.ne(id));
        }
        query
    };

    if let Some(username) = username {
        if taken(Column::Username, username).one(db).await?.is_some() {
            tracing::warn!("Username '{}' already taken", username);
            return Err(DomainError::user_exists(username, IdentifierKind::Username));
        }
    }

    if let Some(email) = email {
        if taken(Column::Email, email).one(db).await?.is_some() {
            tracing::warn!("Email '{}' already taken", email);
            return Err(DomainError::user_exists(email, IdentifierKind::Email));
        }
    }

    Ok(())
}

/// Which unique column a violation message names.
pub(super) fn user_conflict(message: &str, username: &str, email: &str) -> DomainError {
    if message.contains("email") {
        DomainError::user_exists(email, IdentifierKind::Email)
    } else {
        DomainError::user_exists(username, IdentifierKind::Username)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        let user = self
            .db
            .transaction::<_, User, DomainError>(|txn| {
                Box::pin(async move {
                    ensure_available(txn, Some(&input.username), Some(&input.email), None)
                        .await?;

                    let base = ActiveModel {
                        username: Set(input.username.clone()),
                        email: Set(input.email.clone()),
                        password_hash: Set(input.password_hash),
                        user_type: Set(input.user_type),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| {
                        constraints::on_write(e, |msg| {
                            user_conflict(msg, &input.username, &input.email)
                        })
                    })?;

                    let side = match input.user_type {
                        UserType::Buyer => {
                            buyer::ActiveModel { id: Set(base.id) }.insert(txn).await?;
                            None
                        }
                        UserType::Seller => Some(
                            seller::ActiveModel {
                                id: Set(base.id),
                                subscription_level: Set(SubscriptionLevel::Basic),
                            }
                            .insert(txn)
                            .await?,
                        ),
                    };

                    Ok(to_domain(base, side))
                })
            })
            .await?;

        tracing::info!(
            "Created {} '{}' (id {})",
            user.profile.user_type(),
            user.username,
            user.id
        );
        Ok(user)
    }

    async fn find(&self, identifier: &UserIdentifier) -> Result<User, DomainError> {
        let query = match identifier {
            UserIdentifier::Id(id) => UserEntity::find_by_id(*id),
            UserIdentifier::Username(username) => {
                UserEntity::find().filter(Column::Username.eq(username.as_str()))
            }
            UserIdentifier::Email(email) => {
                UserEntity::find().filter(Column::Email.eq(email.as_str()))
            }
        };

        match query
            .find_also_related(seller::Entity)
            .one(&self.db)
            .await?
        {
            Some((user, seller)) => Ok(to_domain(user, seller)),
            None => {
                tracing::warn!("User with {} '{}' not found", identifier.kind(), identifier);
                Err(identifier.not_found())
            }
        }
    }

    async fn find_all(&self, page: Pagination) -> Result<Vec<User>, DomainError> {
        let rows = UserEntity::find()
            .find_also_related(seller::Entity)
            .order_by_asc(Column::Id)
            .offset(page.offset())
            .limit(page.max_rows())
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user, seller)| to_domain(user, seller))
            .collect())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError> {
        self.db
            .transaction::<_, User, DomainError>(|txn| {
                Box::pin(async move {
                    let (existing, seller) = UserEntity::find_by_id(id)
                        .find_also_related(seller::Entity)
                        .one(txn)
                        .await?
                        .ok_or_else(|| DomainError::user_not_found(id, IdentifierKind::Id))?;
                    if changes.is_empty() {
                        return Ok(to_domain(existing, seller));
                    }

                    ensure_available(
                        txn,
                        changes.username.as_deref(),
                        changes.email.as_deref(),
                        Some(id),
                    )
                    .await?;

                    let username = changes
                        .username
                        .clone()
                        .unwrap_or_else(|| existing.username.clone());
                    let email = changes
                        .email
                        .clone()
                        .unwrap_or_else(|| existing.email.clone());

                    let mut active: ActiveModel = existing.into();
                    if let Some(value) = changes.username {
                        active.username = Set(value);
                    }
                    if let Some(value) = changes.email {
                        active.email = Set(value);
                    }
                    if let Some(value) = changes.password_hash {
                        active.password_hash = Set(value);
                    }

                    let updated = active.update(txn).await.map_err(|e| {
                        constraints::on_write(e, |msg| user_conflict(msg, &username, &email))
                    })?;

                    Ok(to_domain(updated, seller))
                })
            })
            .await
            .map_err(DomainError::from)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.db
            .transaction::<_, (), DomainError>(|txn| {
                Box::pin(async move {
                    let existing = UserEntity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| DomainError::user_not_found(id, IdentifierKind::Id))?;

                    let still_referenced = || {
                        format!(
                            "user {} still has products, reviews or favorites attached",
                            id
                        )
                    };

                    let side = match existing.user_type {
                        UserType::Buyer => buyer::Entity::delete_by_id(id).exec(txn).await,
                        UserType::Seller => seller::Entity::delete_by_id(id).exec(txn).await,
                    };
                    side.map_err(|e| constraints::on_delete(e, still_referenced))?;

                    UserEntity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(|e| constraints::on_delete(e, still_referenced))?;

                    Ok(())
                })
            })
            .await?;

        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
