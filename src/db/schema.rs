// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Table definitions and demo data.
//!
//! The schema is created idempotently every time the database is opened.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id           TEXT NOT NULL UNIQUE,
    first_name            TEXT NOT NULL DEFAULT '',
    photo_url             TEXT,
    streak                INTEGER NOT NULL DEFAULT 0 CHECK (streak >= 0),
    wins                  INTEGER NOT NULL DEFAULT 0 CHECK (wins >= 0),
    last_contributed_date TEXT
);

CREATE TABLE IF NOT EXISTS habit_categories (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    name    TEXT NOT NULL,
    UNIQUE (user_id, name)
);

CREATE TABLE IF NOT EXISTS habits (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           INTEGER NOT NULL REFERENCES users(id),
    habit_category_id INTEGER NOT NULL REFERENCES habit_categories(id),
    name              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS duels (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id        INTEGER NOT NULL REFERENCES habits(id),
    duration        INTEGER NOT NULL CHECK (duration BETWEEN 1 AND 30),
    user1_id        INTEGER NOT NULL REFERENCES users(id),
    user2_id        INTEGER REFERENCES users(id),
    user1_completed INTEGER NOT NULL DEFAULT 0,
    user2_completed INTEGER NOT NULL DEFAULT 0,
    status          TEXT NOT NULL DEFAULT 'invited'
                    CHECK (status IN ('invited', 'active', 'ended')),
    start_date      TEXT NOT NULL,
    end_date        TEXT,
    winner_id       INTEGER REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS invitations (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    token   TEXT NOT NULL UNIQUE,
    duel_id INTEGER NOT NULL UNIQUE REFERENCES duels(id)
);

CREATE TABLE IF NOT EXISTS logs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id   INTEGER NOT NULL REFERENCES users(id),
    duel_id    INTEGER NOT NULL REFERENCES duels(id),
    message    TEXT NOT NULL,
    photo      BLOB,
    created_on TEXT NOT NULL,
    UNIQUE (owner_id, duel_id, created_on)
);

CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
CREATE INDEX IF NOT EXISTS idx_duels_user1 ON duels(user1_id);
CREATE INDEX IF NOT EXISTS idx_duels_user2 ON duels(user2_id);
CREATE INDEX IF NOT EXISTS idx_logs_duel ON logs(duel_id);
";

/// Create all tables and indexes if they don't exist.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

const DEMO_USERS: [(&str, &str); 4] = [
    ("MAXID_1", "User 1"),
    ("MAXID_2", "User 2"),
    ("MAXID_3", "User 3"),
    ("MAXID_4", "User 4"),
];

const DEMO_HABITS: [&str; 4] = ["Soccer", "Drinking water", "Not smoking", "Reading books"];

/// Insert four demo users, a habit catalog and two active duels.
///
/// Users are upserted; habits and duels are only added the first time.
/// Returns `true` if demo duels were created.
pub fn seed_demo_data(conn: &mut Connection, today: NaiveDate) -> rusqlite::Result<bool> {
    let tx = conn.transaction()?;

    let mut user_ids = Vec::with_capacity(DEMO_USERS.len());
    for (external_id, name) in DEMO_USERS {
        let id: i64 = tx.query_row(
            "INSERT INTO users (external_id, first_name) VALUES (?1, ?2)
             ON CONFLICT (external_id) DO UPDATE SET first_name = excluded.first_name
             RETURNING id",
            params![external_id, name],
            |row| row.get(0),
        )?;
        user_ids.push(id);
    }

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM habits WHERE user_id = ?1 LIMIT 1",
            params![user_ids[0]],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        tx.commit()?;
        return Ok(false);
    }

    let category_id: i64 = tx.query_row(
        "INSERT INTO habit_categories (user_id, name) VALUES (?1, 'General') RETURNING id",
        params![user_ids[0]],
        |row| row.get(0),
    )?;

    let mut habit_ids = Vec::with_capacity(DEMO_HABITS.len());
    for name in DEMO_HABITS {
        let id: i64 = tx.query_row(
            "INSERT INTO habits (user_id, habit_category_id, name) VALUES (?1, ?2, ?3)
             RETURNING id",
            params![user_ids[0], category_id, name],
            |row| row.get(0),
        )?;
        habit_ids.push(id);
    }

    let demo_duels = [
        (5u32, habit_ids[0], user_ids[0], user_ids[1]),
        (7u32, habit_ids[1], user_ids[2], user_ids[3]),
    ];
    for (duration, habit_id, user1, user2) in demo_duels {
        tx.execute(
            "INSERT INTO duels (habit_id, duration, user1_id, user2_id, status, start_date)
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
            params![habit_id, duration, user1, user2, today],
        )?;
    }

    tx.commit()?;
    Ok(true)
}
