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

//! Key-value store interface.
//!
//! The catalog talks to its storage only through [`TrackStore`]: point
//! operations by composite key plus one bounded scan. Storage internals
//! (durability, replication) stay behind this trait. See
//! [`crate::db::SqliteTrackStore`] for the bundled implementation.

use std::{num::NonZeroU32, sync::Arc};

use thiserror::Error;

use crate::model::{Track, TrackKey};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite failure")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store connection is poisoned")]
    Poisoned,

    #[error("failed to switch to WAL mode, current mode: {0}")]
    JournalMode(String),

    #[error("corrupt record {artist:?} / {song:?}: {reason}")]
    Corrupt {
        artist: String,
        song: String,
        reason: String,
    },
}

/// Case-insensitive substring predicate over the lowercase name fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFilter {
    needle: String,
}

impl ScanFilter {
    /// Builds a filter from free text, or `None` if nothing is left to match
    /// after trimming.
    pub fn contains(text: &str) -> Option<Self> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self { needle })
        }
    }

    /// The trimmed, lowercased search text.
    pub fn needle(&self) -> &str {
        &self.needle
    }
}

/// A single bounded read.
///
/// The store examines at most `limit` records, in key order, strictly after
/// `exclusive_start_key`. The filter only decides which of the examined
/// records are returned, it never widens the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub limit: NonZeroU32,
    pub exclusive_start_key: Option<TrackKey>,
    pub filter: Option<ScanFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Examined records that passed the filter, in key order.
    pub items: Vec<Track>,

    /// Key of the last examined record, present only if more records follow
    /// the read window.
    pub last_evaluated_key: Option<TrackKey>,

    /// Number of records examined, matched or not.
    pub examined: usize,
}

pub trait TrackStore {
    fn get(&self, key: &TrackKey) -> Result<Option<Track>, StoreError>;

    /// Inserts the track or overwrites the record stored under its key.
    fn put(&self, track: &Track) -> Result<(), StoreError>;

    /// Returns whether a record was removed.
    fn delete(&self, key: &TrackKey) -> Result<bool, StoreError>;

    fn scan(&self, request: &ScanRequest) -> Result<ScanOutput, StoreError>;
}

impl<T: TrackStore + ?Sized> TrackStore for Arc<T> {
    fn get(&self, key: &TrackKey) -> Result<Option<Track>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, track: &Track) -> Result<(), StoreError> {
        (**self).put(track)
    }

    fn delete(&self, key: &TrackKey) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn scan(&self, request: &ScanRequest) -> Result<ScanOutput, StoreError> {
        (**self).scan(request)
    }
}
