// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit Duels API Server
//!
//! Serves the duel, habit and contribution endpoints for the mini-app.

use habit_duels::{
    config::Config,
    db::SqliteDb,
    time_utils::{Clock, SystemClock},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Habit Duels API");

    // Open the database (schema is created on open)
    let db = SqliteDb::open(&config.database_path)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if config.seed_demo_data {
        let seeded = db.seed_demo_data(clock.today()).await?;
        tracing::info!(seeded, "Demo data checked");
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, clock));

    // Build router
    let app = habit_duels::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("habit_duels=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
