// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User resolution middleware.
//!
//! The mini-app passes the messenger's user identifier as `max_id` in the
//! query string, together with the display name and avatar it knows about.

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct IdentityQuery {
    max_id: Option<String>,
    first_name: Option<String>,
    photo_url: Option<String>,
}

/// The user making the request, resolved once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves `max_id` to a stored user, creating it on first
/// sight. Requests without an identifier are rejected.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Query(identity) = Query::<IdentityQuery>::try_from_uri(request.uri())?;

    let external_id = identity.max_id.ok_or(AppError::Unauthorized)?;
    let user = state
        .identity
        .resolve(&external_id, identity.first_name, identity.photo_url)
        .await?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
