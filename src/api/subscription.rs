use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::error::{ApiResult, OrStatus, StatusTable};
use crate::domain::{
    ErrorKind, Pagination, Subscription, SubscriptionCreate, SubscriptionUpdate,
};
use crate::infrastructure::AppState;

pub static SUBSCRIPTION_ERRORS: StatusTable = StatusTable(&[
    (ErrorKind::SubscriptionNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::SellerNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::Validation, StatusCode::UNPROCESSABLE_ENTITY),
]);

#[utoipa::path(
    post,
    path = "/api/subscriptions",
    request_body = SubscriptionCreate,
    responses(
        (status = 201, description = "Subscription created", body = Subscription),
        (status = 404, description = "Unknown seller"),
        (status = 422, description = "Unknown level or reversed date range")
    )
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(payload): Json<SubscriptionCreate>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let input = payload.validate().or_status(&SUBSCRIPTION_ERRORS)?;
    let subscription = state
        .subscription_repo
        .create(input)
        .await
        .or_status(&SUBSCRIPTION_ERRORS)?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Subscription>>> {
    let subscriptions = state
        .subscription_repo
        .find_all(page)
        .await
        .or_status(&SUBSCRIPTION_ERRORS)?;
    Ok(Json(subscriptions))
}

pub async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state
        .subscription_repo
        .find_by_id(id)
        .await
        .or_status(&SUBSCRIPTION_ERRORS)?;
    Ok(Json(subscription))
}

pub async fn subscriptions_by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<i32>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Subscription>>> {
    let subscriptions = state
        .subscription_repo
        .find_by_seller(seller_id, page)
        .await
        .or_status(&SUBSCRIPTION_ERRORS)?;
    Ok(Json(subscriptions))
}

pub async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SubscriptionUpdate>,
) -> ApiResult<Json<Subscription>> {
    let changes = payload.validate().or_status(&SUBSCRIPTION_ERRORS)?;
    let subscription = state
        .subscription_repo
        .update(id, changes)
        .await
        .or_status(&SUBSCRIPTION_ERRORS)?;
    Ok(Json(subscription))
}

pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state
        .subscription_repo
        .delete(id)
        .await
        .or_status(&SUBSCRIPTION_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}
