// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile route.

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::UserSummary;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/user/getUserInfo", get(get_user_info))
}

/// Profile, counters and every duel the user takes part in.
async fn get_user_info(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<UserSummary>> {
    let duels = state.ledger.duels_for_user(&user).await?;
    Ok(Json(UserSummary::new(user, duels)))
}
