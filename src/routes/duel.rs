// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Duel routes: creation, invitations, contributions and logs.

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::LogEntry;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Duel routes (require a resolved user).
/// The identity middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/duel/getDuelLogs", get(get_user_logs))
        .route("/duel/{id}/logs", get(get_duel_logs))
        .route("/duel/contribute", post(contribute))
        .route("/duel/createNew", post(create_duel))
        .route("/duel/acceptInvitation", post(accept_invitation))
}

/// Plain acknowledgement.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

// ─── Creation & Invitations ──────────────────────────────────

#[derive(Deserialize)]
pub struct CreateDuelRequest {
    pub habit_id: i64,
    pub days: i64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InvitationResponse {
    pub invitation_link: String,
    pub invitation_token: String,
}

/// Create a duel on one of the user's habits and return its invitation.
async fn create_duel(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<CreateDuelRequest>, JsonRejection>,
) -> Result<Json<InvitationResponse>> {
    let Json(req) = payload?;

    let invitation = state
        .ledger
        .create_duel(&user, req.habit_id, req.days)
        .await?;

    Ok(Json(InvitationResponse {
        invitation_link: invitation.link,
        invitation_token: invitation.token,
    }))
}

#[derive(Deserialize)]
pub struct AcceptInvitationRequest {
    pub invitation_hash: String,
}

/// Join a duel as the opponent.
async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<AcceptInvitationRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = payload?;

    state
        .ledger
        .redeem_invitation(&user, &req.invitation_hash)
        .await?;

    Ok(Json(MessageResponse {
        message: "Invitation accepted, the duel has started".to_string(),
    }))
}

// ─── Contributions ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ContributeRequest {
    pub duel_id: i64,
    pub message: String,
    /// Base64 encoded image
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContributeResponse {
    pub message: String,
    pub won: bool,
    pub streak: u32,
    pub completed: u32,
}

/// Decode an optional base64 photo. Blank means no photo.
fn decode_photo(photo: Option<&str>) -> Result<Option<Vec<u8>>> {
    match photo.map(str::trim) {
        None | Some("") => Ok(None),
        Some(encoded) => STANDARD
            .decode(encoded)
            .map(Some)
            .map_err(|_| AppError::BadRequest("invalid base64 in 'photo'".to_string())),
    }
}

/// Log today's progress on a duel.
async fn contribute(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<ContributeRequest>, JsonRejection>,
) -> Result<Json<ContributeResponse>> {
    // An oversized photo trips the body limit before it can be decoded
    let Json(req) = payload.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge {
            max_bytes: state.config.max_photo_bytes,
        },
        _ => AppError::from(rejection),
    })?;
    let photo = decode_photo(req.photo.as_deref())?;

    let outcome = state
        .contributions
        .record_contribution(&user, req.duel_id, &req.message, photo)
        .await?;

    let message = if outcome.won {
        "Log created, you won the duel!"
    } else {
        "Log created successfully"
    };

    Ok(Json(ContributeResponse {
        message: message.to_string(),
        won: outcome.won,
        streak: outcome.streak,
        completed: outcome.completed,
    }))
}

// ─── Logs ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserLogsQuery {
    /// Internal user ID; defaults to the requesting user
    pub id: Option<i64>,
}

/// All logs written by one user.
async fn get_user_logs(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: std::result::Result<Query<UserLogsQuery>, QueryRejection>,
) -> Result<Json<Vec<LogEntry>>> {
    let Query(params) = query?;
    let user_id = params.id.unwrap_or(user.id);

    tracing::debug!(requested_by = user.id, user_id, "Fetching user logs");
    Ok(Json(state.contributions.logs_for_user(user_id).await?))
}

/// All logs of one duel. Only its participants may read them.
async fn get_duel_logs(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<LogEntry>>> {
    let Path(duel_id) = path?;
    let duel = state.ledger.get_duel(duel_id).await?;
    if !duel.is_participant(user.id) {
        return Err(AppError::NotAParticipant);
    }

    Ok(Json(state.contributions.logs_for_duel(duel_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_photo() {
        assert_eq!(decode_photo(None).unwrap(), None);
        assert_eq!(decode_photo(Some("  ")).unwrap(), None);
        assert_eq!(decode_photo(Some("AQID")).unwrap(), Some(vec![1, 2, 3]));
        assert!(matches!(
            decode_photo(Some("not base64!")),
            Err(AppError::BadRequest(_))
        ));
    }
}
