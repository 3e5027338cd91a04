// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Duel creation, invitation and completion through the HTTP API.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::body_json;

#[tokio::test]
async fn test_create_duel_returns_link_with_token() {
    let app = common::create_test_app();
    let habit_id = app.create_habit("100", "Reading").await;

    let response = app
        .post_json(
            "/duel/createNew?max_id=100",
            json!({ "habit_id": habit_id, "days": 14 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["invitation_token"].as_str().unwrap();
    assert_eq!(token.len(), 64);
    assert_eq!(
        body["invitation_link"],
        format!("https://max.ru/t272_hakaton_bot?startapp={}", token)
    );

    let info = body_json(app.get("/user/getUserInfo?max_id=100").await).await;
    let duel = &info["duels_info"][0];
    assert_eq!(duel["status"], "invited");
    assert_eq!(duel["duration_in_days"], 14);
    assert_eq!(duel["habit_name"], "Reading");
    assert_eq!(duel["user2_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_create_duel_rejects_bad_duration() {
    let app = common::create_test_app();
    let habit_id = app.create_habit("100", "Reading").await;

    for days in [0, 31] {
        let response = app
            .post_json(
                "/duel/createNew?max_id=100",
                json!({ "habit_id": habit_id, "days": days }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "invalid_input");
    }
}

#[tokio::test]
async fn test_create_duel_on_someone_elses_habit() {
    let app = common::create_test_app();
    let habit_id = app.create_habit("100", "Reading").await;

    let response = app
        .post_json(
            "/duel/createNew?max_id=200",
            json!({ "habit_id": habit_id, "days": 3 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn test_accept_invitation_activates_duel() {
    let app = common::create_test_app();
    let duel_id = app.start_duel("100", "200", 5).await;

    let duel = app.state.ledger.get_duel(duel_id).await.unwrap();
    assert_eq!(duel.status.as_str(), "active");

    let info = body_json(app.get("/user/getUserInfo?max_id=100").await).await;
    assert_eq!(info["duels_info"][0]["status"], "active");
    assert_eq!(info["duels_info"][0]["contributed_today"], false);
}

#[tokio::test]
async fn test_invitation_is_single_use() {
    let app = common::create_test_app();
    let habit_id = app.create_habit("100", "Reading").await;
    let token = body_json(
        app.post_json(
            "/duel/createNew?max_id=100",
            json!({ "habit_id": habit_id, "days": 3 }),
        )
        .await,
    )
    .await["invitation_token"]
        .as_str()
        .unwrap()
        .to_string();

    let first = app
        .post_json(
            "/duel/acceptInvitation?max_id=200",
            json!({ "invitation_hash": token }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .post_json(
            "/duel/acceptInvitation?max_id=300",
            json!({ "invitation_hash": token }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(second).await["error"], "invitation_not_found");
}

#[tokio::test]
async fn test_self_invitation_forbidden() {
    let app = common::create_test_app();
    let habit_id = app.create_habit("100", "Reading").await;
    let token = body_json(
        app.post_json(
            "/duel/createNew?max_id=100",
            json!({ "habit_id": habit_id, "days": 3 }),
        )
        .await,
    )
    .await["invitation_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .post_json(
            "/duel/acceptInvitation?max_id=100",
            json!({ "invitation_hash": token }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "self_duel_forbidden");

    // The invitation survives a failed redemption
    let response = app
        .post_json(
            "/duel/acceptInvitation?max_id=200",
            json!({ "invitation_hash": token }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duel_logs_visible_to_participants_only() {
    let app = common::create_test_app();
    let duel_id = app.start_duel("100", "200", 5).await;

    assert_eq!(app.contribute("100", duel_id, "day one").await.status(), 200);
    assert_eq!(app.contribute("200", duel_id, "me too").await.status(), 200);

    let logs = body_json(app.get(&format!("/duel/{}/logs?max_id=200", duel_id)).await).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["message"], "day one");
    assert_eq!(logs[1]["message"], "me too");

    let response = app.get(&format!("/duel/{}/logs?max_id=300", duel_id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.get("/duel/9999/logs?max_id=100").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_info_summarises_wins() {
    let app = common::create_test_app();
    let won = app.start_duel("100", "200", 1).await;
    let _open = app.start_duel("100", "300", 5).await;

    let response = app.contribute("100", won, "quick win").await;
    let body = body_json(response).await;
    assert_eq!(body["won"], true);

    let info = body_json(app.get("/user/getUserInfo?max_id=100&first_name=Anna").await).await;
    assert_eq!(info["first_name"], "Anna");
    assert_eq!(info["wins"], 1);
    assert_eq!(info["ended_duels"], 1);
    assert_eq!(info["winrate"], 1.0);
    assert_eq!(info["streak"], 1);
    assert_eq!(info["last_time_contributed"], "2024-03-01");
    assert_eq!(info["duels_info"].as_array().unwrap().len(), 2);

    let loser = body_json(app.get("/user/getUserInfo?max_id=200").await).await;
    assert_eq!(loser["wins"], 0);
    assert_eq!(loser["winrate"], 0.0);
    assert_eq!(loser["duels_info"][0]["winner_id"], info["id"]);
}
