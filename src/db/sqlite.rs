// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity resolution, streak and win counters)
//! - Habits (per-user catalog)
//! - Duels and invitations (lifecycle transitions)
//! - Logs (one contribution per user, duel and day)
//!
//! Every read-decide-write sequence runs inside a single `IMMEDIATE`
//! transaction, so concurrent callers are serialized and the loser sees the
//! winner's committed state.

use crate::db::schema;
use crate::error::AppError;
use crate::models::{
    ContributionOutcome, Duel, DuelDetails, DuelStatus, Habit, LogEntry, NewLog, User,
};
use crate::services::streak::next_streak;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const DUEL_COLUMNS: &str = "d.id, d.habit_id, d.duration, d.user1_id, d.user2_id, \
     d.user1_completed, d.user2_completed, d.status, d.start_date, d.end_date, d.winner_id";

const USER_COLUMNS: &str =
    "id, external_id, first_name, photo_url, streak, wins, last_contributed_date";

const LOG_COLUMNS: &str = "id, owner_id, duel_id, message, photo, created_on";

impl ToSql for DuelStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DuelStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// SQLite database handle, cheap to clone and shared across requests.
#[derive(Clone)]
pub struct SqliteDb {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDb {
    /// Open (or create) the database at `path`. `":memory:"` opens an
    /// in-memory store.
    pub fn open(path: &str) -> Result<Self, AppError> {
        if path == ":memory:" {
            return Self::open_in_memory();
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("Failed to open {}: {}", path, e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        tracing::info!(path, "Opened SQLite database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database (tests, benchmarks).
    pub fn open_in_memory() -> Result<Self, AppError> {
        tracing::debug!("Opening in-memory SQLite database");
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run blocking SQLite work on the blocking pool with exclusive access
    /// to the connection.
    async fn call<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| AppError::Database(format!("Lock poisoned: {}", e)))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Database task failed: {}", e)))?
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Fetch the user for `external_id`, creating it on first sight.
    ///
    /// Display name and photo are refreshed when provided.
    pub async fn resolve_user(
        &self,
        external_id: String,
        first_name: Option<String>,
        photo_url: Option<String>,
    ) -> Result<User, AppError> {
        self.call(move |conn| {
            let user = conn.query_row(
                &format!(
                    "INSERT INTO users (external_id, first_name, photo_url)
                     VALUES (?1, COALESCE(?2, ''), ?3)
                     ON CONFLICT (external_id) DO UPDATE SET
                         first_name = COALESCE(?2, first_name),
                         photo_url = COALESCE(?3, photo_url)
                     RETURNING {USER_COLUMNS}"
                ),
                params![external_id, first_name, photo_url],
                user_from_row,
            )?;
            Ok(user)
        })
        .await
    }

    /// Get a user by internal ID.
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        self.call(move |conn| Ok(load_user(conn, user_id)?)).await
    }

    // ─── Habit Operations ────────────────────────────────────────

    /// Create a habit, reusing the user's category of the same name.
    pub async fn create_habit(
        &self,
        user_id: i64,
        name: String,
        category: String,
    ) -> Result<Habit, AppError> {
        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let category_id: i64 = tx.query_row(
                "INSERT INTO habit_categories (user_id, name) VALUES (?1, ?2)
                 ON CONFLICT (user_id, name) DO UPDATE SET name = excluded.name
                 RETURNING id",
                params![user_id, category],
                |row| row.get(0),
            )?;

            let id: i64 = tx.query_row(
                "INSERT INTO habits (user_id, habit_category_id, name) VALUES (?1, ?2, ?3)
                 RETURNING id",
                params![user_id, category_id, name],
                |row| row.get(0),
            )?;

            tx.commit()?;

            Ok(Habit {
                id,
                user_id,
                name,
                category,
            })
        })
        .await
    }

    /// All habits owned by a user, oldest first.
    pub async fn habits_for_user(&self, user_id: i64) -> Result<Vec<Habit>, AppError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT h.id, h.user_id, h.name, hc.name FROM habits h
                 JOIN habit_categories hc ON h.habit_category_id = hc.id
                 WHERE h.user_id = ?1
                 ORDER BY h.id",
            )?;
            let habits = stmt
                .query_map(params![user_id], |row| {
                    Ok(Habit {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        category: row.get(3)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(habits)
        })
        .await
    }

    // ─── Duel Operations ─────────────────────────────────────────

    /// Create an `invited` duel and its invitation in one transaction.
    ///
    /// Fails with `NotFound` if the habit doesn't exist or belongs to
    /// someone else.
    pub async fn create_duel(
        &self,
        initiator_id: i64,
        habit_id: i64,
        duration: u32,
        token: String,
        today: NaiveDate,
    ) -> Result<i64, AppError> {
        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let owner: Option<i64> = tx
                .query_row(
                    "SELECT user_id FROM habits WHERE id = ?1",
                    params![habit_id],
                    |row| row.get(0),
                )
                .optional()?;
            if owner != Some(initiator_id) {
                return Err(AppError::NotFound(format!("Habit {} not found", habit_id)));
            }

            let duel_id: i64 = tx.query_row(
                "INSERT INTO duels (habit_id, duration, user1_id, status, start_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id",
                params![habit_id, duration, initiator_id, DuelStatus::Invited, today],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO invitations (token, duel_id) VALUES (?1, ?2)",
                params![token, duel_id],
            )?;

            tx.commit()?;
            Ok(duel_id)
        })
        .await
    }

    /// Redeem an invitation: bind `user_id` as opponent, activate the duel,
    /// and delete the invitation.
    pub async fn redeem_invitation(&self, user_id: i64, token: String) -> Result<Duel, AppError> {
        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let (invitation_id, duel_id): (i64, i64) = tx
                .query_row(
                    "SELECT id, duel_id FROM invitations WHERE token = ?1",
                    params![token],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?
                .ok_or(AppError::InvitationNotFound)?;

            let mut duel = load_duel(&tx, duel_id)?
                .ok_or_else(|| AppError::NotFound(format!("Duel {} not found", duel_id)))?;

            if duel.status != DuelStatus::Invited {
                return Err(AppError::DuelNotInvitable);
            }
            if duel.user1_id == user_id {
                return Err(AppError::SelfDuelForbidden);
            }

            tx.execute(
                "UPDATE duels SET user2_id = ?1, status = ?2 WHERE id = ?3",
                params![user_id, DuelStatus::Active, duel_id],
            )?;
            tx.execute(
                "DELETE FROM invitations WHERE id = ?1",
                params![invitation_id],
            )?;

            tx.commit()?;

            duel.user2_id = Some(user_id);
            duel.status = DuelStatus::Active;
            Ok(duel)
        })
        .await
    }

    /// Get a duel by ID.
    pub async fn get_duel(&self, duel_id: i64) -> Result<Option<Duel>, AppError> {
        self.call(move |conn| Ok(load_duel(conn, duel_id)?)).await
    }

    /// Add one completed day for `user_id`; ends the duel if that reaches
    /// its duration. Returns `true` if this step won the duel.
    pub async fn increment_completion(
        &self,
        duel_id: i64,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<bool, AppError> {
        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let duel = load_duel(&tx, duel_id)?
                .ok_or_else(|| AppError::NotFound(format!("Duel {} not found", duel_id)))?;
            if duel.status != DuelStatus::Active {
                return Err(AppError::DuelNotActive);
            }

            let (_, won) = bump_completion(&tx, &duel, user_id, today)?;
            tx.commit()?;
            Ok(won)
        })
        .await
    }

    /// Duels the user takes part in, with habit and participant details.
    ///
    /// `contributed_today` is computed for `user_id` against `today`.
    pub async fn duels_for_user(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<DuelDetails>, AppError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DUEL_COLUMNS},
                    h.name, hc.name, u1.first_name, u2.first_name, u1.photo_url, u2.photo_url,
                    EXISTS (
                        SELECT 1 FROM logs l
                        WHERE l.duel_id = d.id AND l.owner_id = ?1 AND l.created_on = ?2
                    )
                 FROM duels d
                 JOIN habits h ON d.habit_id = h.id
                 JOIN habit_categories hc ON h.habit_category_id = hc.id
                 JOIN users u1 ON d.user1_id = u1.id
                 LEFT JOIN users u2 ON d.user2_id = u2.id
                 WHERE d.user1_id = ?1 OR d.user2_id = ?1
                 ORDER BY d.id"
            ))?;

            let duels = stmt
                .query_map(params![user_id, today], |row| {
                    Ok(DuelDetails {
                        duel: duel_from_row(row)?,
                        habit_name: row.get(11)?,
                        habit_category: row.get(12)?,
                        user1_first_name: row.get(13)?,
                        user2_first_name: row.get(14)?,
                        user1_photo_url: row.get(15)?,
                        user2_photo_url: row.get(16)?,
                        contributed_today: row.get(17)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(duels)
        })
        .await
    }

    // ─── Contribution Operations ─────────────────────────────────

    /// Record a contribution and apply all of its consequences atomically:
    /// the log row, the duel counter (and win), the user's streak and wins.
    ///
    /// Message and photo must already be validated.
    pub async fn record_contribution(
        &self,
        log: NewLog,
        today: NaiveDate,
    ) -> Result<ContributionOutcome, AppError> {
        self.call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let duel = load_duel(&tx, log.duel_id)?.ok_or(AppError::DuelNotFound)?;
            if duel.status != DuelStatus::Active {
                return Err(AppError::DuelNotActive);
            }
            if !duel.is_participant(log.owner_id) {
                return Err(AppError::NotAParticipant);
            }

            let already: bool = tx.query_row(
                "SELECT EXISTS (
                    SELECT 1 FROM logs WHERE owner_id = ?1 AND duel_id = ?2 AND created_on = ?3
                 )",
                params![log.owner_id, log.duel_id, today],
                |row| row.get(0),
            )?;
            if already {
                return Err(AppError::AlreadyContributedToday);
            }

            let log_id: i64 = tx
                .query_row(
                    "INSERT INTO logs (owner_id, duel_id, message, photo, created_on)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING id",
                    params![log.owner_id, log.duel_id, log.message, log.photo, today],
                    |row| row.get(0),
                )
                .map_err(map_log_insert_error)?;

            let (completed, won) = bump_completion(&tx, &duel, log.owner_id, today)?;

            let user = load_user(&tx, log.owner_id)?
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", log.owner_id)))?;
            let (streak, last_contributed) =
                next_streak(user.last_contributed_date, user.streak, today);

            tx.execute(
                "UPDATE users SET streak = ?1, last_contributed_date = ?2, wins = wins + ?3
                 WHERE id = ?4",
                params![streak, last_contributed, u32::from(won), user.id],
            )?;

            tx.commit()?;

            Ok(ContributionOutcome {
                log_id,
                completed,
                won,
                streak,
            })
        })
        .await
    }

    /// All logs written by a user, oldest first.
    pub async fn logs_for_user(&self, user_id: i64) -> Result<Vec<LogEntry>, AppError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOG_COLUMNS} FROM logs WHERE owner_id = ?1 ORDER BY created_on, id"
            ))?;
            let logs = stmt
                .query_map(params![user_id], log_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
        .await
    }

    /// All logs of one duel, oldest first.
    pub async fn logs_for_duel(&self, duel_id: i64) -> Result<Vec<LogEntry>, AppError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOG_COLUMNS} FROM logs WHERE duel_id = ?1 ORDER BY created_on, id"
            ))?;
            let logs = stmt
                .query_map(params![duel_id], log_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
        .await
    }

    // ─── Maintenance ─────────────────────────────────────────────

    /// Insert demo users, habits and duels (first run only).
    pub async fn seed_demo_data(&self, today: NaiveDate) -> Result<bool, AppError> {
        self.call(move |conn| Ok(schema::seed_demo_data(conn, today)?))
            .await
    }
}

// ─── Row Helpers ───────────────────────────────────────────────

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        external_id: row.get(1)?,
        first_name: row.get(2)?,
        photo_url: row.get(3)?,
        streak: row.get(4)?,
        wins: row.get(5)?,
        last_contributed_date: row.get(6)?,
    })
}

/// Map the leading `DUEL_COLUMNS` of a row.
fn duel_from_row(row: &Row<'_>) -> rusqlite::Result<Duel> {
    Ok(Duel {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        duration: row.get(2)?,
        user1_id: row.get(3)?,
        user2_id: row.get(4)?,
        user1_completed: row.get(5)?,
        user2_completed: row.get(6)?,
        status: row.get(7)?,
        start_date: row.get(8)?,
        end_date: row.get(9)?,
        winner_id: row.get(10)?,
    })
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        duel_id: row.get(2)?,
        message: row.get(3)?,
        photo: row.get(4)?,
        created_on: row.get(5)?,
    })
}

fn load_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![user_id],
        user_from_row,
    )
    .optional()
}

fn load_duel(conn: &Connection, duel_id: i64) -> rusqlite::Result<Option<Duel>> {
    conn.query_row(
        &format!("SELECT {DUEL_COLUMNS} FROM duels d WHERE d.id = ?1"),
        params![duel_id],
        duel_from_row,
    )
    .optional()
}

/// Increment the caller's counter on an active duel and end it if the
/// counter reaches the duration. Must run inside the caller's transaction.
///
/// Returns the new counter value and whether this step won.
fn bump_completion(
    conn: &Connection,
    duel: &Duel,
    user_id: i64,
    today: NaiveDate,
) -> Result<(u32, bool), AppError> {
    let side = duel.side_of(user_id).ok_or(AppError::NotAParticipant)?;
    let column = side.completed_column();

    let completed: u32 = conn.query_row(
        &format!("UPDATE duels SET {column} = {column} + 1 WHERE id = ?1 RETURNING {column}"),
        params![duel.id],
        |row| row.get(0),
    )?;

    let won = completed >= duel.duration;
    if won {
        conn.execute(
            "UPDATE duels SET status = ?1, winner_id = ?2, end_date = ?3 WHERE id = ?4",
            params![DuelStatus::Ended, user_id, today, duel.id],
        )?;
        tracing::info!(
            duel_id = duel.id,
            winner_id = user_id,
            completed,
            "Duel ended"
        );
    }

    Ok((completed, won))
}

/// A unique-index hit on the log table means a same-day duplicate. Other
/// constraint failures stay storage errors.
fn map_log_insert_error(err: rusqlite::Error) -> AppError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            AppError::AlreadyContributedToday
        }
        _ => AppError::from(err),
    }
}
