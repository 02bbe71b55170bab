//! Error taxonomy of the tracker API.
//!
//! Every service function returns `Result<_, AppError>`. Client-facing variants
//! carry the message shown to the user; `Internal` carries diagnostic detail
//! that is logged but never sent over the wire.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, info, warn};
use thiserror::Error;
use tracker_common::responses::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation reported with `409 Conflict`.
    #[error("{0}")]
    Conflict(String),

    /// Uniqueness violation reported with `400 Bad Request`
    /// (duplicate batch code, attendance already marked today).
    #[error("{0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for both flavours of uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_) | AppError::Duplicate(_))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", e))
    }
}

impl From<regex::Error> for AppError {
    fn from(e: regex::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Whether a store error is a rejected insert on a unique index or primary key.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Internal(detail) => {
                error!("Request failed: {}", detail);
                ApiResponse::failure("Server error")
            }
            other if other.is_conflict() => {
                info!("Uniqueness rejected: {}", other);
                ApiResponse::failure(other.to_string())
            }
            other => {
                warn!("Request rejected: {}", other);
                ApiResponse::failure(other.to_string())
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Duplicate("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn both_uniqueness_variants_count_as_conflicts() {
        assert!(AppError::Conflict("x".into()).is_conflict());
        assert!(AppError::Duplicate("x".into()).is_conflict());
        assert!(!AppError::NotFound("x".into()).is_conflict());
    }

    #[actix_web::test]
    async fn internal_detail_stays_out_of_the_body() {
        let response = AppError::Internal("disk I/O error at page 7".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Server error");
        assert!(body.get("error").is_none());
    }
}
