// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use habit_duels::error::AppError;

#[test]
fn test_domain_errors_map_to_codes_and_statuses() {
    let cases = [
        (AppError::Unauthorized, "unauthorized", StatusCode::UNAUTHORIZED),
        (AppError::InvitationNotFound, "invitation_not_found", StatusCode::NOT_FOUND),
        (AppError::DuelNotInvitable, "duel_not_invitable", StatusCode::CONFLICT),
        (AppError::SelfDuelForbidden, "self_duel_forbidden", StatusCode::FORBIDDEN),
        (AppError::DuelNotFound, "duel_not_found", StatusCode::NOT_FOUND),
        (AppError::DuelNotActive, "duel_not_active", StatusCode::CONFLICT),
        (AppError::NotAParticipant, "not_a_participant", StatusCode::FORBIDDEN),
        (AppError::EmptyMessage, "empty_message", StatusCode::BAD_REQUEST),
        (
            AppError::MessageTooLong { max: 500 },
            "message_too_long",
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::PayloadTooLarge { max_bytes: 10 },
            "payload_too_large",
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (
            AppError::AlreadyContributedToday,
            "already_contributed_today",
            StatusCode::CONFLICT,
        ),
    ];

    for (err, code, status) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.status(), status, "{code}");
    }
}

#[test]
fn test_storage_errors_are_internal() {
    let err = AppError::from(rusqlite::Error::QueryReturnedNoRows);
    assert_eq!(err.code(), "database_error");
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

    let err = AppError::Internal(anyhow::anyhow!("boom"));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_message_too_long_mentions_limit() {
    let err = AppError::MessageTooLong { max: 500 };
    assert_eq!(err.to_string(), "Message too long (max 500 characters)");
}
