// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::NaiveDate;
use habit_duels::config::Config;
use habit_duels::db::SqliteDb;
use habit_duels::routes::create_router;
use habit_duels::time_utils::FixedClock;
use habit_duels::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Day every test app starts on.
#[allow(dead_code)]
pub fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Test app handle: router, shared state and the clock driving "today".
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub clock: Arc<FixedClock>,
}

/// Create a test app backed by an in-memory database.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let config = Config::test_default();
    let db = SqliteDb::open_in_memory().expect("Failed to open in-memory database");
    let clock = Arc::new(FixedClock::new(start_day()));

    let state = Arc::new(AppState::new(config, db, clock.clone()));

    TestApp {
        router: create_router(state.clone()),
        state,
        clock,
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn get(&self, uri: &str) -> Response<Body> {
        use tower::ServiceExt;

        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> Response<Body> {
        use tower::ServiceExt;

        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Create a habit for `max_id` and return its id.
    pub async fn create_habit(&self, max_id: &str, name: &str) -> i64 {
        let response = self
            .post_json(
                &format!("/habit/createNew?max_id={}", max_id),
                serde_json::json!({ "habit_name": name, "habit_category": "Sport" }),
            )
            .await;
        assert_eq!(response.status(), 200);

        let habits = body_json(self.get(&format!("/habit/getUserHabits?max_id={}", max_id)).await).await;
        habits
            .as_array()
            .and_then(|h| h.last())
            .and_then(|h| h["id"].as_i64())
            .expect("habit id")
    }

    /// Create a duel from `initiator` and have `opponent` accept it.
    pub async fn start_duel(&self, initiator: &str, opponent: &str, days: i64) -> i64 {
        let habit_id = self.create_habit(initiator, "Running").await;

        let response = self
            .post_json(
                &format!("/duel/createNew?max_id={}", initiator),
                serde_json::json!({ "habit_id": habit_id, "days": days }),
            )
            .await;
        assert_eq!(response.status(), 200);
        let token = body_json(response).await["invitation_token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = self
            .post_json(
                &format!("/duel/acceptInvitation?max_id={}", opponent),
                serde_json::json!({ "invitation_hash": token }),
            )
            .await;
        assert_eq!(response.status(), 200);

        let info = body_json(self.get(&format!("/user/getUserInfo?max_id={}", opponent)).await).await;
        info["duels_info"]
            .as_array()
            .and_then(|d| d.last())
            .and_then(|d| d["id"].as_i64())
            .expect("duel id")
    }

    pub async fn contribute(&self, max_id: &str, duel_id: i64, message: &str) -> Response<Body> {
        self.post_json(
            &format!("/duel/contribute?max_id={}", max_id),
            serde_json::json!({ "duel_id": duel_id, "message": message }),
        )
        .await
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
