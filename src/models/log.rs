// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Contribution log model.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest accepted contribution message, in Unicode code points.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// One user's contribution to one duel on one day. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogEntry {
    #[serde(rename = "log_id")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub owner_id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duel_id: i64,
    pub message: String,
    /// Photo bytes, base64 encoded on the wire
    #[serde(serialize_with = "serialize_photo")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub photo: Option<Vec<u8>>,
    #[serde(rename = "created_at")]
    pub created_on: NaiveDate,
}

fn serialize_photo<S: Serializer>(photo: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match photo {
        Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
        None => s.serialize_none(),
    }
}

/// A validated contribution ready to be written.
#[derive(Debug, Clone)]
pub struct NewLog {
    pub owner_id: i64,
    pub duel_id: i64,
    /// Already trimmed
    pub message: String,
    pub photo: Option<Vec<u8>>,
}

/// Result of a successful contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ContributionOutcome {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub log_id: i64,
    /// The contributor's completed days in this duel after the write
    pub completed: u32,
    /// This contribution ended the duel in the contributor's favour
    pub won: bool,
    /// The contributor's streak after the write
    pub streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_serializes_as_base64() {
        let entry = LogEntry {
            id: 7,
            owner_id: 1,
            duel_id: 2,
            message: "ran 5k".to_string(),
            photo: Some(vec![0xde, 0xad, 0xbe, 0xef]),
            created_on: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["log_id"], 7);
        assert_eq!(json["photo"], "3q2+7w==");
        assert_eq!(json["created_at"], "2024-03-09");
    }
}
