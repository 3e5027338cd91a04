// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Each variant is one failure kind; the boundary maps kinds to status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("User identifier is required")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invitation link has expired or does not exist")]
    InvitationNotFound,

    #[error("Duel is not open for invitation")]
    DuelNotInvitable,

    #[error("You cannot start a duel with yourself")]
    SelfDuelForbidden,

    #[error("Duel not found")]
    DuelNotFound,

    #[error("Duel is not active")]
    DuelNotActive,

    #[error("User is not a participant of this duel")]
    NotAParticipant,

    #[error("Message cannot be empty or whitespace only")]
    EmptyMessage,

    #[error("Message too long (max {max} characters)")]
    MessageTooLong { max: usize },

    #[error("Photo too large (max {max_bytes} bytes)")]
    PayloadTooLarge { max_bytes: usize },

    #[error("You have already contributed to this duel today")]
    AlreadyContributedToday,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for this failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::InvitationNotFound => "invitation_not_found",
            AppError::DuelNotInvitable => "duel_not_invitable",
            AppError::SelfDuelForbidden => "self_duel_forbidden",
            AppError::DuelNotFound => "duel_not_found",
            AppError::DuelNotActive => "duel_not_active",
            AppError::NotAParticipant => "not_a_participant",
            AppError::EmptyMessage => "empty_message",
            AppError::MessageTooLong { .. } => "message_too_long",
            AppError::PayloadTooLarge { .. } => "payload_too_large",
            AppError::AlreadyContributedToday => "already_contributed_today",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this failure kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_)
            | AppError::InvalidInput(_)
            | AppError::EmptyMessage
            | AppError::MessageTooLong { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::InvitationNotFound | AppError::DuelNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::SelfDuelForbidden | AppError::NotAParticipant => StatusCode::FORBIDDEN,
            AppError::DuelNotInvitable
            | AppError::DuelNotActive
            | AppError::AlreadyContributedToday => StatusCode::CONFLICT,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
            other => Some(other.to_string()),
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("invalid {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::InvalidInput(messages.join("; "))
    }
}
