use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::error::{ApiResult, OrStatus, StatusTable};
use crate::domain::{ErrorKind, Pagination, Review, ReviewCreate, ReviewUpdate};
use crate::infrastructure::AppState;

pub static REVIEW_ERRORS: StatusTable = StatusTable(&[
    (ErrorKind::ReviewNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::ReviewAlreadyExists, StatusCode::BAD_REQUEST),
    (ErrorKind::InvalidReference, StatusCode::BAD_REQUEST),
    (ErrorKind::Validation, StatusCode::UNPROCESSABLE_ENTITY),
]);

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = ReviewCreate,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Duplicate review or unknown user/product"),
        (status = 422, description = "Self-review or comment too long")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewCreate>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let input = payload.validate().or_status(&REVIEW_ERRORS)?;
    let review = state
        .review_repo
        .create(input)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state
        .review_repo
        .find_all(page)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok(Json(reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Review>> {
    let review = state
        .review_repo
        .find_by_id(id)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok(Json(review))
}

pub async fn reviews_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state
        .review_repo
        .find_by_product(product_id, page)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok(Json(reviews))
}

pub async fn reviews_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Review>>> {
    let reviews = state
        .review_repo
        .find_by_reviewed_user(user_id, page)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok(Json(reviews))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ReviewUpdate>,
) -> ApiResult<Json<Review>> {
    let changes = payload.validate().or_status(&REVIEW_ERRORS)?;
    let review = state
        .review_repo
        .update(id, changes)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state
        .review_repo
        .delete(id)
        .await
        .or_status(&REVIEW_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}
