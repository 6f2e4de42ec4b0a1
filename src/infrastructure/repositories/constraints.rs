//! Classification of storage constraint failures.
//!
//! Application pre-checks give the friendly error on the common path; these
//! helpers turn the constraint violations that still slip through (two
//! writers racing on the same key) into the same domain errors.

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Map a failed insert or update.
///
/// Unique violations become whatever `already_exists` builds from the driver
/// message, foreign key violations become [`DomainError::InvalidReference`].
pub(crate) fn on_write<F>(err: DbErr, already_exists: F) -> DomainError
where
    F: FnOnce(&str) -> DomainError,
{
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            tracing::warn!("Unique constraint rejected write: {}", msg);
            already_exists(&msg)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            tracing::warn!("Foreign key rejected write: {}", msg);
            DomainError::InvalidReference(msg)
        }
        _ => {
            tracing::error!("Database error during write: {}", err);
            err.into()
        }
    }
}

/// Map a failed delete. Rows still pointed at by a restricting foreign key
/// become [`DomainError::StillReferenced`].
pub(crate) fn on_delete<F>(err: DbErr, what: F) -> DomainError
where
    F: FnOnce() -> String,
{
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            let what = what();
            tracing::warn!("Delete refused, {}", what);
            DomainError::StillReferenced(what)
        }
        _ => {
            tracing::error!("Database error during delete: {}", err);
            err.into()
        }
    }
}
