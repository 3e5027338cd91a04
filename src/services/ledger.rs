// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Duel ledger: creation, invitation redemption and completion counters.

use crate::db::SqliteDb;
use crate::error::AppError;
use crate::models::{Duel, DuelDetails, Invitation, NewDuel, User};
use crate::time_utils::Clock;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use validator::Validate;

/// Random bytes behind each invitation token.
const TOKEN_ENTROPY_BYTES: usize = 32;

/// Owns every duel state transition.
#[derive(Clone)]
pub struct DuelLedger {
    db: SqliteDb,
    clock: Arc<dyn Clock>,
    invitation_base_url: String,
    rng: SystemRandom,
}

impl DuelLedger {
    pub fn new(db: SqliteDb, clock: Arc<dyn Clock>, invitation_base_url: &str) -> Self {
        Self {
            db,
            clock,
            invitation_base_url: invitation_base_url.trim_end_matches('/').to_string(),
            rng: SystemRandom::new(),
        }
    }

    /// Create an `invited` duel on one of the initiator's habits and mint
    /// its invitation.
    pub async fn create_duel(
        &self,
        initiator: &User,
        habit_id: i64,
        duration_days: i64,
    ) -> Result<Invitation, AppError> {
        let new_duel = NewDuel {
            habit_id,
            duration_days,
        };
        new_duel.validate()?;
        let duration = u32::try_from(new_duel.duration_days)
            .map_err(|_| AppError::InvalidInput("invalid duel duration".to_string()))?;

        let token = self.mint_token()?;
        let duel_id = self
            .db
            .create_duel(
                initiator.id,
                habit_id,
                duration,
                token.clone(),
                self.clock.today(),
            )
            .await?;

        tracing::info!(
            duel_id,
            initiator_id = initiator.id,
            habit_id,
            duration,
            "Duel created"
        );

        Ok(Invitation {
            duel_id,
            link: self.invitation_link(&token),
            token,
        })
    }

    /// Join `user` to the duel behind `token` as its opponent.
    pub async fn redeem_invitation(&self, user: &User, token: &str) -> Result<Duel, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::InvitationNotFound);
        }

        let duel = self
            .db
            .redeem_invitation(user.id, token.to_string())
            .await?;

        tracing::info!(duel_id = duel.id, opponent_id = user.id, "Invitation redeemed");
        Ok(duel)
    }

    pub async fn get_duel(&self, duel_id: i64) -> Result<Duel, AppError> {
        self.db
            .get_duel(duel_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Duel {} not found", duel_id)))
    }

    /// Add one completed day for `user` without writing a log.
    ///
    /// Returns `true` if this step ended the duel in `user`'s favour.
    pub async fn increment_completion(&self, duel_id: i64, user: &User) -> Result<bool, AppError> {
        self.db
            .increment_completion(duel_id, user.id, self.clock.today())
            .await
    }

    /// Every duel `user` takes part in, whatever its status.
    pub async fn duels_for_user(&self, user: &User) -> Result<Vec<DuelDetails>, AppError> {
        self.db.duels_for_user(user.id, self.clock.today()).await
    }

    /// Fresh random bytes from the OS, as lowercase hex.
    fn mint_token(&self) -> Result<String, AppError> {
        let mut seed = [0u8; TOKEN_ENTROPY_BYTES];
        self.rng
            .fill(&mut seed)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
        Ok(hex::encode(seed))
    }

    fn invitation_link(&self, token: &str) -> String {
        format!(
            "{}?startapp={}",
            self.invitation_base_url,
            urlencoding::encode(token)
        )
    }
}
