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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite result rows
//! and [`Track`] records. Rows are first read into plain structs and then
//! validated, so a record that violates the data model surfaces as
//! [`StoreError::Corrupt`] instead of a half-built track.

use rusqlite::Row;

use crate::{
    model::{Track, TrackKey},
    store::StoreError,
};

/// Raw `tracks` row, as selected by [`super::TRACK_COLUMNS`].
#[derive(Debug)]
pub(super) struct TrackRow {
    artist: String,
    song: String,
    blob_key: String,
    duration_seconds: Option<i64>,
}

impl TrackRow {
    /// Maps an SQLite row to a [`TrackRow`] instance.
    ///
    /// This is a helper function designed to be used with
    /// [`rusqlite::Statement::query_map`].
    pub(super) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            artist: row.get(0)?,
            song: row.get(1)?,
            blob_key: row.get(2)?,
            duration_seconds: row.get(3)?,
        })
    }

    fn corrupt(&self, reason: impl ToString) -> StoreError {
        StoreError::Corrupt {
            artist: self.artist.clone(),
            song: self.song.clone(),
            reason: reason.to_string(),
        }
    }
}

impl TryFrom<TrackRow> for Track {
    type Error = StoreError;

    fn try_from(row: TrackRow) -> Result<Self, Self::Error> {
        let duration_seconds = row
            .duration_seconds
            .map(u32::try_from)
            .transpose()
            .map_err(|e| row.corrupt(e))?;

        let key = TrackKey::new(&row.artist, &row.song).map_err(|e| row.corrupt(e))?;
        Track::new(key, &row.blob_key, duration_seconds).map_err(|e| row.corrupt(e))
    }
}

/// A row of a bounded scan window together with the filter verdict the
/// database computed for it.
#[derive(Debug)]
pub(super) struct ScanRow {
    pub(super) track: TrackRow,
    pub(super) matched: bool,
}

impl ScanRow {
    pub(super) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            track: TrackRow::from_row(row)?,
            matched: row.get(4)?,
        })
    }
}
