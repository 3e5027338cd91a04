//! User model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User record, created the first time an external identifier is seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal ID
    pub id: i64,
    /// Opaque identifier from the messenger platform
    pub external_id: String,
    /// Display name
    pub first_name: String,
    /// Profile picture URL
    pub photo_url: Option<String>,
    /// Consecutive calendar days with at least one contribution
    pub streak: u32,
    /// Duels won
    pub wins: u32,
    /// Day of the most recent contribution, if any
    pub last_contributed_date: Option<NaiveDate>,
}
