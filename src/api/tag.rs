use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::error::{ApiResult, OrStatus, StatusTable};
use crate::domain::{ErrorKind, Pagination, Tag, TagCreate, TagUpdate};
use crate::infrastructure::AppState;

pub static TAG_ERRORS: StatusTable = StatusTable(&[
    (ErrorKind::TagNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::TagAlreadyExists, StatusCode::BAD_REQUEST),
    (ErrorKind::Validation, StatusCode::UNPROCESSABLE_ENTITY),
]);

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = TagCreate,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Name already taken")
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<TagCreate>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let name = payload.validate().or_status(&TAG_ERRORS)?;
    let tag = state.tag_repo.create(name).await.or_status(&TAG_ERRORS)?;
    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    get,
    path = "/api/tags",
    params(Pagination),
    responses((status = 200, description = "Page of tags", body = [Tag]))
)]
pub async fn list_tags(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Tag>>> {
    let tags = state.tag_repo.find_all(page).await.or_status(&TAG_ERRORS)?;
    Ok(Json(tags))
}

pub async fn get_tag(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Tag>> {
    let tag = state.tag_repo.find_by_id(id).await.or_status(&TAG_ERRORS)?;
    Ok(Json(tag))
}

pub async fn get_tag_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Tag>> {
    let tag = state
        .tag_repo
        .find_by_name(&name)
        .await
        .or_status(&TAG_ERRORS)?;
    Ok(Json(tag))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TagUpdate>,
) -> ApiResult<Json<Tag>> {
    let name = payload.validate().or_status(&TAG_ERRORS)?;
    let tag = state.tag_repo.rename(id, name).await.or_status(&TAG_ERRORS)?;
    Ok(Json(tag))
}

pub async fn delete_tag(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<StatusCode> {
    state.tag_repo.delete(id).await.or_status(&TAG_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}
