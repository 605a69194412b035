// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Data access layer.
//!
//! This module implements [`TrackStore`] on top of SQLite, including schema
//! creation and the bounded window scan used for pagination. It uses cached
//! statements to optimize frequently executed queries.
//!
//! # Tables
//!
//! * `tracks` - One row per `(artist, song)` composite key, with the
//!   lowercase shadow columns used for search, the blob key and the
//!   optional duration.
//!
//! # Ordering
//!
//! Key columns use SQLite's default `BINARY` collation, so rows sort by the
//! bytes of their UTF-8 text. That is the same order as [`TrackKey`]'s
//! derived [`Ord`].

mod model;

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, params};

use self::model::{ScanRow, TrackRow};
use crate::{
    model::{Track, TrackKey},
    store::{ScanFilter, ScanOutput, ScanRequest, StoreError, TrackStore},
};

const TRACK_COLUMNS: &str = "artist, song, blob_key, duration_seconds";

// The fifth column is the filter verdict, evaluated over the stored
// lowercase columns. A NULL needle matches everything.
const SCAN_FROM_START: &str = "
    SELECT artist, song, blob_key, duration_seconds,
           (?1 IS NULL OR instr(artist_lower, ?1) > 0 OR instr(song_lower, ?1) > 0)
    FROM tracks
    ORDER BY artist, song
    LIMIT ?2";

const SCAN_AFTER_KEY: &str = "
    SELECT artist, song, blob_key, duration_seconds,
           (?3 IS NULL OR instr(artist_lower, ?3) > 0 OR instr(song_lower, ?3) > 0)
    FROM tracks
    WHERE (artist, song) > (?1, ?2)
    ORDER BY artist, song
    LIMIT ?4";

/// SQLite backed track store.
///
/// The connection sits behind a [`Mutex`] so one store can be shared by
/// concurrent callers. Every trait method is a single, self-contained
/// statement.
#[derive(Debug)]
pub struct SqliteTrackStore {
    conn: Mutex<Connection>,
}

impl SqliteTrackStore {
    /// Opens a store backed by the database file at `path`.
    ///
    /// This function performs the following setup:
    /// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
    /// * **Performance Tuning**: Sets synchronous mode to `NORMAL` and increases the cache size.
    /// * **Schema**: Executes [`create_schema`] to ensure the table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The database file cannot be opened.
    /// * The journal cannot be switched to WAL mode.
    /// * The schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
        if journal_mode != "wal" {
            return Err(StoreError::JournalMode(journal_mode));
        }

        Self::with_connection(conn)
    }

    /// Opens a private, in-memory store. Nothing survives the process.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000; -- Use 64MB of RAM for cache
        ",
        )?;

        conn.set_prepared_statement_cache_capacity(100);

        create_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Counts all stored tracks.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))?;
        Ok(count.unsigned_abs())
    }
}

/// Create the database schema.
///
/// The `tracks` table is keyed by `(artist, song)` and stored without a
/// rowid, so the primary key index is the table itself and range scans walk
/// it in key order.
///
/// This operation is wrapped in a single SQL transaction to ensure the schema
/// is updated atomically.
fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS tracks (
            artist TEXT NOT NULL,
            song TEXT NOT NULL,
            artist_lower TEXT NOT NULL,
            song_lower TEXT NOT NULL,
            blob_key TEXT NOT NULL,
            duration_seconds INTEGER CHECK (duration_seconds IS NULL OR duration_seconds >= 0),
            PRIMARY KEY (artist, song)
        ) WITHOUT ROWID;

        COMMIT;",
    )?;
    Ok(())
}

impl TrackStore for SqliteTrackStore {
    fn get(&self, key: &TrackKey) -> Result<Option<Track>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE artist = ?1 AND song = ?2");

        let mut stmt = conn.prepare_cached(&sql)?;
        let row = stmt
            .query_row(params![key.artist(), key.song()], TrackRow::from_row)
            .optional()?;

        row.map(Track::try_from).transpose()
    }

    fn put(&self, track: &Track) -> Result<(), StoreError> {
        let sql = "
            INSERT INTO tracks (artist, song, artist_lower, song_lower, blob_key, duration_seconds)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (artist, song)
            DO UPDATE SET artist_lower = ?3, song_lower = ?4, blob_key = ?5, duration_seconds = ?6";

        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(sql)?;
        stmt.execute(params![
            track.artist(),
            track.song(),
            track.artist_lower(),
            track.song_lower(),
            track.blob_key(),
            track.duration_seconds(),
        ])?;

        Ok(())
    }

    fn delete(&self, key: &TrackKey) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached("DELETE FROM tracks WHERE artist = ?1 AND song = ?2")?;
        let deleted = stmt.execute(params![key.artist(), key.song()])?;

        Ok(deleted > 0)
    }

    /// Reads one window of at most `request.limit` rows.
    ///
    /// One extra probe row is fetched to learn whether anything follows the
    /// window. It is never examined or returned.
    fn scan(&self, request: &ScanRequest) -> Result<ScanOutput, StoreError> {
        let limit = request.limit.get() as usize;
        let probe_limit = i64::from(request.limit.get()) + 1;
        let needle = request.filter.as_ref().map(ScanFilter::needle);

        let conn = self.conn()?;
        let mut rows = match &request.exclusive_start_key {
            None => {
                let mut stmt = conn.prepare_cached(SCAN_FROM_START)?;
                stmt.query_map(params![needle, probe_limit], ScanRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?
            }
            Some(start) => {
                let mut stmt = conn.prepare_cached(SCAN_AFTER_KEY)?;
                stmt.query_map(
                    params![start.artist(), start.song(), needle, probe_limit],
                    ScanRow::from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?
            }
        };
        drop(conn);

        let more = rows.len() > limit;
        rows.truncate(limit);

        let examined = rows.len();
        let mut last_examined = None;
        let mut items = Vec::new();
        for row in rows {
            let track = Track::try_from(row.track)?;
            if more {
                last_examined = Some(track.key());
            }
            if row.matched {
                items.push(track);
            }
        }

        log::debug!(
            "Scanned {examined} tracks after {:?}, {} matched, more: {more}",
            request.exclusive_start_key,
            items.len()
        );

        Ok(ScanOutput {
            items,
            last_evaluated_key: last_examined,
            examined,
        })
    }
}
