//! HTTP error boundary
//!
//! Handlers never choose status codes for domain errors themselves. Each
//! router group declares a static [`StatusTable`] and converts failures with
//! [`OrStatus::or_status`]; anything the table does not list becomes a 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::{DomainError, ErrorKind};

pub type ApiResult<T> = Result<T, ApiError>;

/// An error already bound to its transport status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Declarative error-kind to status mapping for one router group.
#[derive(Debug)]
pub struct StatusTable(pub &'static [(ErrorKind, StatusCode)]);

impl StatusTable {
    pub fn status_for(&self, kind: ErrorKind) -> Option<StatusCode> {
        self.0
            .iter()
            .find(|(mapped, _)| *mapped == kind)
            .map(|(_, status)| *status)
    }

    pub fn map(&self, err: DomainError) -> ApiError {
        match self.status_for(err.kind()) {
            Some(status) => {
                if status.is_server_error() {
                    tracing::error!("{}", err);
                } else {
                    tracing::debug!("{} -> {}", err, status);
                }
                ApiError::new(status, err.to_string())
            }
            None => {
                tracing::error!("Unmapped error ({:?}): {}", err.kind(), err);
                ApiError::internal()
            }
        }
    }
}

/// Boundary conversion from domain results to HTTP results.
pub trait OrStatus<T> {
    fn or_status(self, table: &StatusTable) -> ApiResult<T>;
}

impl<T> OrStatus<T> for Result<T, DomainError> {
    fn or_status(self, table: &StatusTable) -> ApiResult<T> {
        self.map_err(|err| table.map(err))
    }
}
