use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::error::{ApiResult, OrStatus, StatusTable};
use crate::domain::{ErrorKind, Favorite, FavoriteCreate, Pagination};
use crate::infrastructure::AppState;

pub static FAVORITE_ERRORS: StatusTable = StatusTable(&[
    (ErrorKind::FavoriteNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::NoFavoritesFound, StatusCode::NOT_FOUND),
    (ErrorKind::BuyerNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::ProductNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::FavoriteAlreadyExists, StatusCode::BAD_REQUEST),
    (ErrorKind::InvalidReference, StatusCode::BAD_REQUEST),
]);

#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = FavoriteCreate,
    responses(
        (status = 201, description = "Favorite created", body = Favorite),
        (status = 400, description = "Already a favorite"),
        (status = 404, description = "Unknown buyer or product")
    )
)]
pub async fn create_favorite(
    State(state): State<AppState>,
    Json(payload): Json<FavoriteCreate>,
) -> ApiResult<(StatusCode, Json<Favorite>)> {
    let favorite = state
        .favorite_repo
        .create(payload)
        .await
        .or_status(&FAVORITE_ERRORS)?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Favorite>>> {
    let favorites = state
        .favorite_repo
        .find_all(page)
        .await
        .or_status(&FAVORITE_ERRORS)?;
    Ok(Json(favorites))
}

pub async fn get_favorite(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Favorite>> {
    let favorite = state
        .favorite_repo
        .find_by_id(id)
        .await
        .or_status(&FAVORITE_ERRORS)?;
    Ok(Json(favorite))
}

pub async fn favorites_by_buyer(
    State(state): State<AppState>,
    Path(buyer_id): Path<i32>,
) -> ApiResult<Json<Vec<Favorite>>> {
    let favorites = state
        .favorite_repo
        .find_by_buyer(buyer_id)
        .await
        .or_status(&FAVORITE_ERRORS)?;
    Ok(Json(favorites))
}

pub async fn favorites_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Favorite>>> {
    let favorites = state
        .favorite_repo
        .find_by_username(&username)
        .await
        .or_status(&FAVORITE_ERRORS)?;
    Ok(Json(favorites))
}

pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state
        .favorite_repo
        .delete(id)
        .await
        .or_status(&FAVORITE_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}
