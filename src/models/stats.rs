//! Per-user summary shown on the duels page.
//!
//! Built from the user row and the user's duel listing; nothing here is
//! stored.

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{DuelDetails, DuelStatus, User};

/// Profile, counters and duels for the requesting user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserSummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub first_name: String,
    pub photo_url: Option<String>,
    pub streak: u32,
    pub wins: u32,
    /// Duels the user took part in that have ended
    pub ended_duels: u32,
    /// `wins / ended_duels`, 0 when nothing has ended yet
    pub winrate: f32,
    pub last_time_contributed: Option<NaiveDate>,
    pub duels_info: Vec<DuelDetails>,
}

impl UserSummary {
    pub fn new(user: User, duels: Vec<DuelDetails>) -> Self {
        let ended_duels = duels
            .iter()
            .filter(|d| d.duel.status == DuelStatus::Ended)
            .count() as u32;

        Self {
            id: user.id,
            first_name: user.first_name,
            photo_url: user.photo_url,
            streak: user.streak,
            wins: user.wins,
            ended_duels,
            winrate: winrate(user.wins, ended_duels),
            last_time_contributed: user.last_contributed_date,
            duels_info: duels,
        }
    }
}

fn winrate(wins: u32, ended: u32) -> f32 {
    if ended == 0 {
        0.0
    } else {
        wins as f32 / ended as f32
    }
}
