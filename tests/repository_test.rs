use crafty::db;
use chrono::NaiveDate;
use crafty::domain::{
    DomainError, ErrorKind, FavoriteCreate, NewProduct, NewReview, NewSubscription, NewUser,
    Pagination, ProductChanges, ReviewChanges, SubscriptionChanges, UserChanges, UserIdentifier,
    UserProfile,
};
use crafty::infrastructure::AppState;
use crafty::models::{Rating, SubscriptionLevel, UserType};

async fn setup_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn new_user(username: &str, user_type: UserType) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@x.com", username),
        password_hash: "hash".to_string(),
        user_type,
    }
}

fn new_product(name: &str, seller_id: i32, tag_ids: Vec<i32>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: Some("handmade".to_string()),
        price: 10,
        seller_id,
        tag_ids,
    }
}

#[tokio::test]
async fn test_sellers_start_on_basic() {
    let state = setup_state().await;
    let alice = state
        .user_repo
        .create(new_user("alice", UserType::Seller))
        .await
        .unwrap();

    let found = state
        .user_repo
        .find(&UserIdentifier::Id(alice.id))
        .await
        .unwrap();
    assert_eq!(
        found.profile,
        UserProfile::Seller {
            subscription_level: SubscriptionLevel::Basic
        }
    );
}

#[tokio::test]
async fn test_duplicate_create_fails_exactly_once() {
    let state = setup_state().await;
    state
        .user_repo
        .create(new_user("alice", UserType::Buyer))
        .await
        .unwrap();

    let err = state
        .user_repo
        .create(new_user("alice", UserType::Buyer))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UserAlreadyExists);

    let users = state.user_repo.find_all(Pagination::default()).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_partial_update_leaves_other_fields() {
    let state = setup_state().await;
    let alice = state
        .user_repo
        .create(new_user("alice", UserType::Seller))
        .await
        .unwrap();
    let product = state
        .product_repo
        .create(new_product("Lamp", alice.id, vec![]))
        .await
        .unwrap();

    let updated = state
        .product_repo
        .update(
            product.id,
            ProductChanges {
                price: Some(99),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 99);
    assert_eq!(updated.name, "Lamp");
    assert_eq!(updated.description.as_deref(), Some("handmade"));
}

#[tokio::test]
async fn test_unknown_tag_rolls_back_product() {
    let state = setup_state().await;
    let alice = state
        .user_repo
        .create(new_user("alice", UserType::Seller))
        .await
        .unwrap();

    let err = state
        .product_repo
        .create(new_product("Rug", alice.id, vec![77]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagNotFound);

    let products = state
        .product_repo
        .find_all(Pagination::default())
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_review_without_product_is_deduplicated() {
    let state = setup_state().await;
    let alice = state
        .user_repo
        .create(new_user("alice", UserType::Seller))
        .await
        .unwrap();
    let bob = state
        .user_repo
        .create(new_user("bob", UserType::Buyer))
        .await
        .unwrap();

    let review = NewReview {
        rating: Rating::Four,
        comment: None,
        reviewer_id: bob.id,
        reviewed_user_id: alice.id,
        product_id: None,
    };
    let created = state.review_repo.create(review.clone()).await.unwrap();
    let err = state.review_repo.create(review).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ReviewAlreadyExists {
            product_id: None,
            ..
        }
    ));

    // Clearing a comment is distinct from leaving it alone
    let updated = state
        .review_repo
        .update(
            created.id,
            ReviewChanges {
                rating: None,
                comment: Some(Some("great".to_string())),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.comment.as_deref(), Some("great"));
    assert_eq!(updated.rating, Rating::Four);
}

#[tokio::test]
async fn test_deleting_a_product_cascades_favorites() {
    let state = setup_state().await;
    let alice = state
        .user_repo
        .create(new_user("alice", UserType::Seller))
        .await
        .unwrap();
    let bob = state
        .user_repo
        .create(new_user("bob", UserType::Buyer))
        .await
        .unwrap();
    let product = state
        .product_repo
        .create(new_product("Basket", alice.id, vec![]))
        .await
        .unwrap();

    state
        .favorite_repo
        .create(FavoriteCreate {
            buyer_id: bob.id,
            product_id: product.id,
        })
        .await
        .unwrap();
    state.product_repo.delete(product.id).await.unwrap();

    let err = state.favorite_repo.find_by_buyer(bob.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoFavoritesFound);
}

#[tokio::test]
async fn test_empty_updates_return_rows_unchanged() {
    let state = setup_state().await;
    let alice = state
        .user_repo
        .create(new_user("alice", UserType::Seller))
        .await
        .unwrap();
    let bob = state
        .user_repo
        .create(new_user("bob", UserType::Buyer))
        .await
        .unwrap();
    let product = state
        .product_repo
        .create(new_product("Basket", alice.id, vec![]))
        .await
        .unwrap();
    let review = state
        .review_repo
        .create(NewReview {
            rating: Rating::Five,
            comment: Some("lovely".to_string()),
            reviewer_id: bob.id,
            reviewed_user_id: alice.id,
            product_id: Some(product.id),
        })
        .await
        .unwrap();
    let subscription = state
        .subscription_repo
        .create(NewSubscription {
            seller_id: alice.id,
            subscription_level: SubscriptionLevel::Premium,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        })
        .await
        .unwrap();

    let same = state
        .user_repo
        .update(bob.id, UserChanges::default())
        .await
        .unwrap();
    assert_eq!(same, bob);

    let same = state
        .product_repo
        .update(product.id, ProductChanges::default())
        .await
        .unwrap();
    assert_eq!(same, product);

    let same = state
        .review_repo
        .update(review.id, ReviewChanges::default())
        .await
        .unwrap();
    assert_eq!(same, review);

    let same = state
        .subscription_repo
        .update(subscription.id, SubscriptionChanges::default())
        .await
        .unwrap();
    assert_eq!(same, subscription);

    // Unknown ids still fail even with nothing to change
    let err = state
        .review_repo
        .update(9999, ReviewChanges::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReviewNotFound);
    let err = state
        .subscription_repo
        .update(9999, SubscriptionChanges::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SubscriptionNotFound);
}
