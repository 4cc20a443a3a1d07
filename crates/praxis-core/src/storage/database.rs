//! SQLite-based ledger storage.
//!
//! Two logical collections keyed by (user, topic): the access ledger and
//! the progress ledger, the latter backed by a row table plus a normalized
//! completed-day set table so add-to-set is a single `INSERT OR IGNORE`.
//!
//! Every mutation is a single atomic statement or a single transaction;
//! there is no read-then-write anywhere, so near-simultaneous calls for
//! the same key cannot double-serve or double-advance.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::config::StorageConfig;
use crate::error::StoreError;
use crate::gate::{AccessRecord, AccessStore};
use crate::key::LedgerKey;
use crate::program::TopicId;
use crate::progress::{ProgressSnapshot, ProgressStore};

/// SQLite database holding both ledgers.
///
/// Opened once at process start, shared by the gate and the ledger, and
/// closed explicitly at shutdown.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `path`, creating the schema if needed.
    ///
    /// The busy timeout from `options` bounds how long any store call may
    /// wait on a locked database; on expiry the call fails with
    /// [`StoreError::Unavailable`] instead of blocking.
    pub fn open(path: impl AsRef<Path>, options: &StorageConfig) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            StoreError::Unavailable(format!("cannot open {}: {err}", path.display()))
        })?;
        conn.busy_timeout(Duration::from_millis(options.busy_timeout_ms))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Close the connection explicitly.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_conn, err)| err.into())
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS access_ledger (
                user_id         TEXT NOT NULL,
                topic_id        INTEGER NOT NULL,
                last_access_at  TEXT NOT NULL,
                last_access_day INTEGER NOT NULL,
                next_reset_at   TEXT NOT NULL,
                PRIMARY KEY (user_id, topic_id)
            );

            CREATE TABLE IF NOT EXISTS progress_ledger (
                user_id     TEXT NOT NULL,
                topic_id    INTEGER NOT NULL,
                current_day INTEGER NOT NULL,
                started     INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, topic_id)
            );

            CREATE TABLE IF NOT EXISTS progress_completed (
                user_id  TEXT NOT NULL,
                topic_id INTEGER NOT NULL,
                day      INTEGER NOT NULL,
                PRIMARY KEY (user_id, topic_id, day)
            );

            CREATE INDEX IF NOT EXISTS idx_progress_completed_user
                ON progress_completed(user_id);",
        )?;
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Corrupt(format!("bad timestamp {raw:?}: {err}")))
}

fn parse_topic(raw: u8) -> Result<TopicId, StoreError> {
    TopicId::new(raw).map_err(|_| StoreError::Corrupt(format!("topic id {raw} out of range")))
}

impl AccessStore for Database {
    fn find_access(&self, key: &LedgerKey) -> Result<Option<AccessRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT last_access_at, last_access_day, next_reset_at
             FROM access_ledger WHERE user_id = ?1 AND topic_id = ?2",
        )?;
        let row = stmt
            .query_row(params![key.user_id, key.topic_id.get()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .optional()?;
        match row {
            None => Ok(None),
            Some((last_access_at, last_access_day, next_reset_at)) => Ok(Some(AccessRecord {
                last_access_at: parse_timestamp(&last_access_at)?,
                last_access_day,
                next_reset_at: parse_timestamp(&next_reset_at)?,
            })),
        }
    }

    fn upsert_access(&self, key: &LedgerKey, record: &AccessRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO access_ledger
                 (user_id, topic_id, last_access_at, last_access_day, next_reset_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, topic_id) DO UPDATE SET
                 last_access_at = excluded.last_access_at,
                 last_access_day = excluded.last_access_day,
                 next_reset_at = excluded.next_reset_at",
            params![
                key.user_id,
                key.topic_id.get(),
                record.last_access_at.to_rfc3339(),
                record.last_access_day,
                record.next_reset_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_access(&self, key: &LedgerKey) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM access_ledger WHERE user_id = ?1 AND topic_id = ?2",
            params![key.user_id, key.topic_id.get()],
        )?;
        Ok(())
    }
}

impl ProgressStore for Database {
    fn find_progress(&self, key: &LedgerKey) -> Result<Option<ProgressSnapshot>, StoreError> {
        let row = self
            .conn
            .prepare(
                "SELECT current_day, started FROM progress_ledger
                 WHERE user_id = ?1 AND topic_id = ?2",
            )?
            .query_row(params![key.user_id, key.topic_id.get()], |row| {
                Ok((row.get::<_, u32>(0)?, row.get::<_, bool>(1)?))
            })
            .optional()?;
        let Some((current_day, started)) = row else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT day FROM progress_completed
             WHERE user_id = ?1 AND topic_id = ?2",
        )?;
        let completed_days = stmt
            .query_map(params![key.user_id, key.topic_id.get()], |row| {
                row.get::<_, u32>(0)
            })?
            .collect::<Result<BTreeSet<u32>, _>>()?;

        Ok(Some(ProgressSnapshot {
            current_day,
            started,
            completed_days,
        }))
    }

    fn upsert_day(&self, key: &LedgerKey, day: u32) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO progress_ledger (user_id, topic_id, current_day, started)
             VALUES (?1, ?2, ?3, 1)
             ON CONFLICT(user_id, topic_id) DO UPDATE SET
                 current_day = excluded.current_day,
                 started = 1",
            params![key.user_id, key.topic_id.get(), day],
        )?;
        Ok(())
    }

    fn add_completed_day(
        &self,
        key: &LedgerKey,
        day: u32,
        next_day: u32,
    ) -> Result<(), StoreError> {
        // Set union and pointer advance commit together or not at all.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO progress_completed (user_id, topic_id, day)
             VALUES (?1, ?2, ?3)",
            params![key.user_id, key.topic_id.get(), day],
        )?;
        tx.execute(
            "INSERT INTO progress_ledger (user_id, topic_id, current_day, started)
             VALUES (?1, ?2, ?3, 0)
             ON CONFLICT(user_id, topic_id) DO UPDATE SET
                 current_day = excluded.current_day",
            params![key.user_id, key.topic_id.get(), next_day],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn completed_counts(&self, user_id: &str) -> Result<BTreeMap<TopicId, u32>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT topic_id, COUNT(*) FROM progress_completed
             WHERE user_id = ?1 GROUP BY topic_id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, u8>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (topic_id, count) = row?;
            counts.insert(parse_topic(topic_id)?, count);
        }
        Ok(counts)
    }
}
