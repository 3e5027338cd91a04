// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contribution engine.
//!
//! Validates a daily contribution and hands it to the store, which applies
//! the log, duel counter, win and streak updates in one transaction.

use crate::db::SqliteDb;
use crate::error::AppError;
use crate::models::log::MAX_MESSAGE_CHARS;
use crate::models::{ContributionOutcome, LogEntry, NewLog, User};
use crate::time_utils::Clock;
use std::sync::Arc;

#[derive(Clone)]
pub struct ContributionEngine {
    db: SqliteDb,
    clock: Arc<dyn Clock>,
    max_photo_bytes: usize,
}

impl ContributionEngine {
    pub fn new(db: SqliteDb, clock: Arc<dyn Clock>, max_photo_bytes: usize) -> Self {
        Self {
            db,
            clock,
            max_photo_bytes,
        }
    }

    /// Record today's contribution by `user` to `duel_id`.
    ///
    /// Input is checked before anything touches the store; a failure at any
    /// step leaves no trace.
    pub async fn record_contribution(
        &self,
        user: &User,
        duel_id: i64,
        message: &str,
        photo: Option<Vec<u8>>,
    ) -> Result<ContributionOutcome, AppError> {
        let message = validate_message(message)?;
        let photo = self.validate_photo(photo)?;

        let today = self.clock.today();
        let outcome = self
            .db
            .record_contribution(
                NewLog {
                    owner_id: user.id,
                    duel_id,
                    message,
                    photo,
                },
                today,
            )
            .await?;

        tracing::info!(
            user_id = user.id,
            duel_id,
            log_id = outcome.log_id,
            completed = outcome.completed,
            won = outcome.won,
            streak = outcome.streak,
            %today,
            "Contribution recorded"
        );

        Ok(outcome)
    }

    /// Everything `user_id` has logged, across duels.
    pub async fn logs_for_user(&self, user_id: i64) -> Result<Vec<LogEntry>, AppError> {
        self.db.logs_for_user(user_id).await
    }

    /// Both participants' logs for one duel.
    pub async fn logs_for_duel(&self, duel_id: i64) -> Result<Vec<LogEntry>, AppError> {
        self.db.logs_for_duel(duel_id).await
    }

    fn validate_photo(&self, photo: Option<Vec<u8>>) -> Result<Option<Vec<u8>>, AppError> {
        match photo {
            Some(bytes) if bytes.is_empty() => Ok(None),
            Some(bytes) if bytes.len() > self.max_photo_bytes => Err(AppError::PayloadTooLarge {
                max_bytes: self.max_photo_bytes,
            }),
            other => Ok(other),
        }
    }
}

/// Trimmed message, or why it can't be stored.
fn validate_message(message: &str) -> Result<String, AppError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AppError::EmptyMessage);
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::MessageTooLong {
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(message.to_string())
}
