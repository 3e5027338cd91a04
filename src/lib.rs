// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Habit Duels: two-person habit competitions
//!
//! This crate provides the backend API for a messenger mini-app where two
//! users race to keep up the same habit for a fixed number of days.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::SqliteDb;
use services::{ContributionEngine, DuelLedger, HabitCatalog, IdentityResolver};
use std::sync::Arc;
use time_utils::Clock;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: SqliteDb,
    pub clock: Arc<dyn Clock>,
    pub identity: IdentityResolver,
    pub habits: HabitCatalog,
    pub ledger: DuelLedger,
    pub contributions: ContributionEngine,
}

impl AppState {
    /// Wire all services to one store and one clock.
    pub fn new(config: Config, db: SqliteDb, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity: IdentityResolver::new(db.clone()),
            habits: HabitCatalog::new(db.clone()),
            ledger: DuelLedger::new(db.clone(), clock.clone(), &config.invitation_base_url),
            contributions: ContributionEngine::new(
                db.clone(),
                clock.clone(),
                config.max_photo_bytes,
            ),
            config,
            db,
            clock,
        }
    }
}
