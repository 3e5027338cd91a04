// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit catalog routes.

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{Habit, NewHabit};
use crate::routes::duel::MessageResponse;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/habit/createNew", post(create_habit))
        .route("/habit/getUserHabits", get(get_user_habits))
}

#[derive(Deserialize)]
pub struct CreateHabitRequest {
    pub habit_name: String,
    pub habit_category: String,
}

async fn create_habit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<CreateHabitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = payload?;

    state
        .habits
        .create_habit(
            &user,
            NewHabit {
                name: req.habit_name,
                category: req.habit_category,
            },
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Habit created successfully".to_string(),
    }))
}

async fn get_user_habits(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Habit>>> {
    Ok(Json(state.habits.habits_for_user(&user).await?))
}
