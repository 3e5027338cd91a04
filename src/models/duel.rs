// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Duel model and its lifecycle states.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Longest allowed duel, in contributed days.
pub const MAX_DUEL_DAYS: u32 = 30;

/// Lifecycle state of a duel.
///
/// `Invited` is the only creation state and `Ended` is terminal:
/// `Invited -> Active -> Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum DuelStatus {
    Invited,
    Active,
    Ended,
}

impl DuelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DuelStatus::Invited => "invited",
            DuelStatus::Active => "active",
            DuelStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for DuelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(DuelStatus::Invited),
            "active" => Ok(DuelStatus::Active),
            "ended" => Ok(DuelStatus::Ended),
            other => Err(format!("unknown duel status: {other}")),
        }
    }
}

/// Which side of a duel a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Initiator,
    Opponent,
}

impl Side {
    /// Column holding this side's completion counter.
    pub fn completed_column(self) -> &'static str {
        match self {
            Side::Initiator => "user1_completed",
            Side::Opponent => "user2_completed",
        }
    }
}

/// Stored duel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Duel {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub habit_id: i64,
    /// Contributed days required to win
    #[serde(rename = "duration_in_days")]
    pub duration: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user1_id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub user2_id: Option<i64>,
    pub user1_completed: u32,
    pub user2_completed: u32,
    pub status: DuelStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub winner_id: Option<i64>,
}

impl Duel {
    /// Side `user_id` plays on, or `None` for outsiders.
    pub fn side_of(&self, user_id: i64) -> Option<Side> {
        if self.user1_id == user_id {
            Some(Side::Initiator)
        } else if self.user2_id == Some(user_id) {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    pub fn is_participant(&self, user_id: i64) -> bool {
        self.side_of(user_id).is_some()
    }

    /// Days completed by `user_id` (0 for outsiders).
    pub fn completed_by(&self, user_id: i64) -> u32 {
        match self.side_of(user_id) {
            Some(Side::Initiator) => self.user1_completed,
            Some(Side::Opponent) => self.user2_completed,
            None => 0,
        }
    }
}

/// Duel joined with its habit and participant profiles, for listings.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DuelDetails {
    #[serde(flatten)]
    pub duel: Duel,
    pub habit_name: String,
    pub habit_category: String,
    pub user1_first_name: String,
    pub user2_first_name: Option<String>,
    pub user1_photo_url: Option<String>,
    pub user2_photo_url: Option<String>,
    /// Whether the requesting user already logged this duel today
    pub contributed_today: bool,
}

/// A freshly minted invitation for an `Invited` duel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub duel_id: i64,
    /// 64 lowercase hex characters
    pub token: String,
    /// Shareable link embedding the token
    pub link: String,
}

/// Parameters of a duel about to be created.
#[derive(Debug, Clone, Copy, Validate)]
pub struct NewDuel {
    pub habit_id: i64,
    #[validate(range(min = 1, max = 30, message = "duel should last from 1 to 30 days"))]
    pub duration_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duel() -> Duel {
        Duel {
            id: 1,
            habit_id: 1,
            duration: 3,
            user1_id: 10,
            user2_id: Some(20),
            user1_completed: 2,
            user2_completed: 1,
            status: DuelStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            winner_id: None,
        }
    }

    #[test]
    fn test_side_of_participants_and_outsiders() {
        let duel = duel();
        assert_eq!(duel.side_of(10), Some(Side::Initiator));
        assert_eq!(duel.side_of(20), Some(Side::Opponent));
        assert_eq!(duel.side_of(30), None);
        assert_eq!(duel.completed_by(10), 2);
        assert_eq!(duel.completed_by(30), 0);
    }

    #[test]
    fn test_invited_duel_has_no_opponent_side() {
        let mut duel = duel();
        duel.user2_id = None;
        duel.status = DuelStatus::Invited;
        assert!(!duel.is_participant(20));
    }

    #[test]
    fn test_duration_bounds() {
        let new = |duration_days| NewDuel {
            habit_id: 1,
            duration_days,
        };
        assert!(new(0).validate().is_err());
        assert!(new(1).validate().is_ok());
        assert!(new(i64::from(MAX_DUEL_DAYS)).validate().is_ok());
        assert!(new(31).validate().is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("ended".parse::<DuelStatus>(), Ok(DuelStatus::Ended));
        assert!("archived".parse::<DuelStatus>().is_err());
        assert_eq!(DuelStatus::Active.to_string(), "active");
    }
}
