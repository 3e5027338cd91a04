// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod contribution;
pub mod habits;
pub mod identity;
pub mod ledger;
pub mod streak;

pub use contribution::ContributionEngine;
pub use habits::HabitCatalog;
pub use identity::IdentityResolver;
pub use ledger::DuelLedger;
