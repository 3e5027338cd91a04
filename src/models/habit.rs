// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Habit catalog model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Longest habit name or category, in Unicode code points.
pub const MAX_HABIT_FIELD_CHARS: usize = 30;

/// A habit owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Habit {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
    pub category: String,
}

/// Habit fields as submitted, before they are stored.
#[derive(Debug, Clone, Validate)]
pub struct NewHabit {
    #[validate(length(min = 2, max = 30, message = "habit name should be from 2 to 30 symbols"))]
    pub name: String,
    #[validate(length(
        min = 2,
        max = 30,
        message = "habit category should be from 2 to 30 symbols"
    ))]
    pub category: String,
}
