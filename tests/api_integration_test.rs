use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use crafty::api;
use crafty::db;
use crafty::infrastructure::AppState;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create the API router over a fresh in-memory database
async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    api::api_router(AppState::new(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_user(app: &Router, username: &str, user_type: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({
            "username": username,
            "email": format!("{}@x.com", username),
            "password_hash": "hash",
            "user_type": user_type
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_marketplace_scenario() {
    let app = setup_app().await;

    let (status, alice) = send(
        &app,
        "POST",
        "/users",
        Some(json!({
            "username": "alice",
            "email": "a@x.com",
            "password_hash": "hash",
            "user_type": "seller"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alice["user_type"], "seller");
    assert_eq!(alice["subscription_level"], "basic");
    assert!(alice.get("password_hash").is_none());

    // Same username, different email
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({
            "username": "alice",
            "email": "other@x.com",
            "password_hash": "hash",
            "user_type": "buyer"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User with username 'alice' already exists");

    let bob = create_user(&app, "bob", "buyer").await;

    let (status, widget) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Widget", "price": 10, "seller_id": alice["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(widget["name"], "Widget");
    assert_eq!(widget["images"], json!([]));

    let review = json!({
        "rating": 5,
        "reviewer_id": bob["id"],
        "reviewed_user_id": alice["id"],
        "product_id": widget["id"]
    });
    let (status, _) = send(&app, "POST", "/reviews", Some(review.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/reviews", Some(review)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/products/{}", widget["id"]);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The review outlives the product
    let (status, reviews) = send(&app, "GET", "/reviews", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews[0]["product_id"], Value::Null);
}

#[tokio::test]
async fn test_user_lookups() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "buyer").await;
    let id = alice["id"].as_i64().unwrap();

    for uri in [
        format!("/users/id/{}", id),
        "/users/username/alice".to_string(),
        "/users/email/alice@x.com".to_string(),
        format!("/users/lookup/id/{}", id),
        "/users/lookup/email/alice@x.com".to_string(),
    ] {
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["id"], alice["id"]);
        assert_eq!(body["user_type"], "buyer");
    }

    let (status, _) = send(&app, "GET", "/users/lookup/phone/123", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/users/lookup/id/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(&app, "GET", "/users/username/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User with username 'nobody' does not exist");
}

#[tokio::test]
async fn test_user_partial_update_and_delete() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    create_user(&app, "bob", "buyer").await;
    let uri = format!("/users/{}", alice["id"]);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"email": "new@x.com"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@x.com");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["subscription_level"], "basic");

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"username": "bob"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/users/username/alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seller_with_products_cannot_be_deleted() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    let (status, _) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Vase", "price": 30, "seller_id": alice["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/users/{}", alice["id"]), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Rolled back: the seller is still whole
    let (status, body) = send(&app, "GET", "/users/username/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscription_level"], "basic");
}

#[tokio::test]
async fn test_product_images_and_tags() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    let (_, eco) = send(&app, "POST", "/tags", Some(json!({"name": "eco"}))).await;
    let (_, wood) = send(&app, "POST", "/tags", Some(json!({"name": "wood"}))).await;

    let (status, product) = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Bowl",
            "description": "Turned oak",
            "price": 25,
            "seller_id": alice["id"],
            "tag_ids": [eco["id"]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["tags"][0]["name"], "eco");
    let id = product["id"].as_i64().unwrap();

    let (status, image) = send(
        &app,
        "POST",
        &format!("/products/{}/images", id),
        Some(json!({"image_url": "https://img.test/bowl.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let image_uri = format!("/products/images/{}", image["id"]);
    let (status, body) = send(&app, "GET", &image_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product_id"], id);

    let tag_uri = format!("/products/{}/tags/{}", id, wood["id"]);
    let (status, tags) = send(&app, "PUT", &tag_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().unwrap().len(), 2);
    // Idempotent
    let (status, tags) = send(&app, "PUT", &tag_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().unwrap().len(), 2);

    let (_, product) = send(&app, "GET", &format!("/products/{}", id), None).await;
    assert_eq!(product["images"][0]["image_url"], "https://img.test/bowl.png");
    assert_eq!(product["tags"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "DELETE", &tag_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &tag_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &image_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, images) = send(&app, "GET", &format!("/products/{}/images", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(images, json!([]));

    // Clearing the description leaves the other fields alone
    let (status, product) = send(
        &app,
        "PUT",
        &format!("/products/{}", id),
        Some(json!({"description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["description"], Value::Null);
    assert_eq!(product["price"], 25);
}

#[tokio::test]
async fn test_products_by_seller() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    let uri = format!("/products/sellers/{}/products", alice["id"]);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for (name, price) in [("Cup", 5), ("Plate", 8), ("Jug", 12)] {
        send(
            &app,
            "POST",
            "/products",
            Some(json!({"name": name, "price": price, "seller_id": alice["id"]})),
        )
        .await;
    }

    let (status, products) = send(&app, "GET", &format!("{}?skip=1&limit=1", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["name"], "Plate");
}

#[tokio::test]
async fn test_oversized_paging_is_clamped() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Cup", "price": 5, "seller_id": alice["id"]})),
    )
    .await;
    let huge = u64::MAX;

    let (status, users) = send(&app, "GET", &format!("/users?limit={}", huge), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);

    let (status, users) = send(
        &app,
        "GET",
        &format!("/users?skip={}&limit={}", huge, huge),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users, json!([]));

    let (status, products) =
        send(&app, "GET", &format!("/products?skip={}", huge), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products, json!([]));

    let uri = format!("/products/sellers/{}/products?limit={}", alice["id"], huge);
    let (status, products) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products[0]["name"], "Cup");
}

#[tokio::test]
async fn test_tags_crud() {
    let app = setup_app().await;

    let (status, tag) = send(&app, "POST", "/tags", Some(json!({"name": "  knit "}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tag["name"], "knit");

    let (status, _) = send(&app, "POST", "/tags", Some(json!({"name": "knit"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/tags/name/knit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], tag["id"]);

    let uri = format!("/tags/{}", tag["id"]);
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"name": "crochet"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "crochet");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_by_product_and_user() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    let bob = create_user(&app, "bob", "buyer").await;
    let (_, mug) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Mug", "price": 9, "seller_id": alice["id"]})),
    )
    .await;

    let (status, review) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({
            "rating": 4,
            "comment": "Lovely",
            "reviewer_id": bob["id"],
            "reviewed_user_id": alice["id"],
            "product_id": mug["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["rating"], 4);

    let (_, by_product) = send(&app, "GET", &format!("/reviews/product/{}", mug["id"]), None).await;
    assert_eq!(by_product.as_array().unwrap().len(), 1);
    let (_, by_user) = send(&app, "GET", &format!("/reviews/user/{}", alice["id"]), None).await;
    assert_eq!(by_user.as_array().unwrap().len(), 1);

    let uri = format!("/reviews/{}", review["id"]);
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"rating": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 2);
    assert_eq!(body["comment"], "Lovely");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_product_delete_refuses_duplicate_detached_reviews() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    let bob = create_user(&app, "bob", "buyer").await;
    let (_, widget) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Widget", "price": 15, "seller_id": alice["id"]})),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({
            "rating": 5,
            "reviewer_id": bob["id"],
            "reviewed_user_id": alice["id"],
            "product_id": widget["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, general) = send(
        &app,
        "POST",
        "/reviews",
        Some(json!({
            "rating": 3,
            "reviewer_id": bob["id"],
            "reviewed_user_id": alice["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Detaching the product review would leave two reviews for bob -> alice
    let uri = format!("/products/{}", widget["id"]);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, reviews) = send(&app, "GET", "/reviews", None).await;
    assert_eq!(reviews.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "DELETE", &format!("/reviews/{}", general["id"]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, reviews) = send(&app, "GET", "/reviews", None).await;
    assert_eq!(reviews[0]["product_id"], Value::Null);
    assert_eq!(reviews[0]["rating"], 5);
}

#[tokio::test]
async fn test_favorites() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;
    let bob = create_user(&app, "bob", "buyer").await;
    let (_, scarf) = send(
        &app,
        "POST",
        "/products",
        Some(json!({"name": "Scarf", "price": 40, "seller_id": alice["id"]})),
    )
    .await;

    let (status, _) = send(&app, "GET", "/favorites/buyer/username/bob", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let payload = json!({"buyer_id": bob["id"], "product_id": scarf["id"]});
    let (status, favorite) = send(&app, "POST", "/favorites", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/favorites", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A seller is not a buyer
    let (status, _) = send(
        &app,
        "POST",
        "/favorites",
        Some(json!({"buyer_id": alice["id"], "product_id": scarf["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = send(&app, "GET", "/favorites/buyer/username/bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["id"], favorite["id"]);
    let (status, list) = send(&app, "GET", &format!("/favorites/buyer/{}", bob["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/favorites/{}", favorite["id"]);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscriptions() {
    let app = setup_app().await;
    let alice = create_user(&app, "alice", "seller").await;

    let (status, subscription) = send(
        &app,
        "POST",
        "/subscriptions",
        Some(json!({
            "seller_id": alice["id"],
            "subscription_level": "premium",
            "start_date": "2024-01-01",
            "end_date": "2024-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["subscription_level"], "premium");

    let uri = format!("/subscriptions/{}", subscription["id"]);
    // Moving the start past the stored end is rejected
    let (status, _) = send(&app, "PUT", &uri, Some(json!({"start_date": "2025-06-01"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"subscription_level": "pro"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscription_level"], "pro");
    assert_eq!(body["end_date"], "2024-12-31");

    let (status, list) = send(
        &app,
        "GET",
        &format!("/subscriptions/seller/{}", alice["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "crafty");
}
