// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod duel;
pub mod habit;
pub mod log;
pub mod stats;
pub mod user;

pub use duel::{Duel, DuelDetails, DuelStatus, Invitation, NewDuel};
pub use habit::{Habit, NewHabit};
pub use log::{ContributionOutcome, LogEntry, NewLog};
pub use stats::UserSummary;
pub use user::User;
