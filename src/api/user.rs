//! User handlers: buyers and sellers behind one resource

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::error::{ApiResult, OrStatus, StatusTable};
use crate::domain::{
    ErrorKind, Pagination, User, UserCreate, UserIdentifier, UserUpdate,
};
use crate::infrastructure::AppState;

pub static USER_ERRORS: StatusTable = StatusTable(&[
    (ErrorKind::UserAlreadyExists, StatusCode::BAD_REQUEST),
    (ErrorKind::InvalidUserType, StatusCode::BAD_REQUEST),
    (ErrorKind::InvalidIdentifierKind, StatusCode::BAD_REQUEST),
    (ErrorKind::InvalidIdentifier, StatusCode::BAD_REQUEST),
    (ErrorKind::UserNotFound, StatusCode::NOT_FOUND),
    (ErrorKind::StillReferenced, StatusCode::CONFLICT),
    (ErrorKind::Validation, StatusCode::UNPROCESSABLE_ENTITY),
]);

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Username or email taken, or unknown user type"),
        (status = 422, description = "Invalid field")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let input = payload.validate().or_status(&USER_ERRORS)?;
    let user = state.user_repo.create(input).await.or_status(&USER_ERRORS)?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(Pagination),
    responses((status = 200, description = "Page of users"))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.user_repo.find_all(page).await.or_status(&USER_ERRORS)?;
    Ok(Json(users))
}

async fn find(state: &AppState, identifier: UserIdentifier) -> ApiResult<Json<User>> {
    let user = state
        .user_repo
        .find(&identifier)
        .await
        .or_status(&USER_ERRORS)?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/users/id/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<User>> {
    find(&state, UserIdentifier::Id(id)).await
}

pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    find(&state, UserIdentifier::Username(username)).await
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<User>> {
    find(&state, UserIdentifier::Email(email)).await
}

/// Generic lookup; `kind` is one of `id`, `username` or `email`.
#[utoipa::path(
    get,
    path = "/api/users/lookup/{kind}/{identifier}",
    params(
        ("kind" = String, Path, description = "id, username or email"),
        ("identifier" = String, Path, description = "Value to look up")
    ),
    responses(
        (status = 200, description = "User found"),
        (status = 400, description = "Unknown identifier kind"),
        (status = 404, description = "No such user")
    )
)]
pub async fn lookup_user(
    State(state): State<AppState>,
    Path((kind, identifier)): Path<(String, String)>,
) -> ApiResult<Json<User>> {
    let identifier = UserIdentifier::parse(&kind, &identifier).or_status(&USER_ERRORS)?;
    find(&state, identifier).await
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UserUpdate,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated"),
        (status = 404, description = "No such user")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    let changes = payload.validate().or_status(&USER_ERRORS)?;
    let user = state
        .user_repo
        .update(id, changes)
        .await
        .or_status(&USER_ERRORS)?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user"),
        (status = 409, description = "User still owns products or reviews")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.user_repo.delete(id).await.or_status(&USER_ERRORS)?;
    Ok(StatusCode::NO_CONTENT)
}
