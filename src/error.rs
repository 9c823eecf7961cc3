use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::models::SeatSet;

/// Failures of the persistence collaborators (show store, booking store).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The outcome is unknown: the write may or may not have landed.
    #[error("store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }
}

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No show matched with all requested seats free. Also covers an unknown show id.
    #[error("{} requested seat(s) are not available", seats.len())]
    Conflict { seats: SeatSet },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("lock service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("channel backend error: {0}")]
    Backend(String),
}

/// Side-effect failures after a successful claim. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("clearing seat locks failed: {0}")]
    Locks(#[from] LockError),

    #[error("publishing show update failed: {0}")]
    Publish(#[from] PublishError),
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        match self {
            ReservationError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ReservationError::Conflict { seats } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "one or more requested seats are not available",
                    "seats": seats
                })),
            )
                .into_response(),
            ReservationError::Storage(err) if err.is_retryable() => {
                tracing::warn!("reservation outcome indeterminate: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    [(header::RETRY_AFTER, "1")],
                    Json(json!({
                        "error": "booking outcome unknown, check your bookings before retrying",
                        "retryable": true
                    })),
                )
                    .into_response()
            }
            ReservationError::Storage(err) => {
                tracing::error!("reservation storage failure: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}
