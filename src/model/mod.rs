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

//! Domain models and core data structures.
//!
//! This module defines the catalog entities: the composite [`TrackKey`], the
//! stored [`Track`] record and the [`TrackMetadata`] submitted by clients.
//!
//! A [`Track`] can only be built through [`Track::new`], which derives the
//! lowercase search fields from the key. They are never accepted from the
//! outside, so they cannot drift from the names they shadow.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CatalogError, Result};

/// Composite primary key of a track: partition key `artist`, sort key `song`.
///
/// Both components are trimmed and must not be empty. Case is preserved.
/// The derived ordering (artist first, then song) is the catalog's native
/// scan order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackKey {
    artist: String,
    song: String,
}

impl TrackKey {
    pub fn new(artist: impl AsRef<str>, song: impl AsRef<str>) -> Result<Self> {
        let artist = artist.as_ref().trim();
        if artist.is_empty() {
            return Err(CatalogError::InvalidKey { field: "artist" });
        }

        let song = song.as_ref().trim();
        if song.is_empty() {
            return Err(CatalogError::InvalidKey { field: "song" });
        }

        Ok(Self {
            artist: artist.to_owned(),
            song: song.to_owned(),
        })
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn song(&self) -> &str {
        &self.song
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.song)
    }
}

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    artist: String,
    song: String,
    artist_lower: String,
    song_lower: String,
    blob_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<u32>,
}

impl Track {
    pub fn new(key: TrackKey, blob_key: impl AsRef<str>, duration_seconds: Option<u32>) -> Result<Self> {
        let blob_key = blob_key.as_ref().trim();
        if blob_key.is_empty() {
            return Err(CatalogError::InvalidBlobKey);
        }

        let TrackKey { artist, song } = key;
        Ok(Self {
            artist_lower: artist.to_lowercase(),
            song_lower: song.to_lowercase(),
            artist,
            song,
            blob_key: blob_key.to_owned(),
            duration_seconds,
        })
    }

    pub fn key(&self) -> TrackKey {
        TrackKey {
            artist: self.artist.clone(),
            song: self.song.clone(),
        }
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn song(&self) -> &str {
        &self.song
    }

    pub fn artist_lower(&self) -> &str {
        &self.artist_lower
    }

    pub fn song_lower(&self) -> &str {
        &self.song_lower
    }

    pub fn blob_key(&self) -> &str {
        &self.blob_key
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        self.duration_seconds
    }
}

/// Metadata submitted for a track once its payload has been uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub artist: String,
    pub song: String,
    pub blob_key: String,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

impl TrackMetadata {
    /// Validates the submission and turns it into a storable [`Track`].
    pub fn into_track(self) -> Result<Track> {
        let key = TrackKey::new(&self.artist, &self.song)?;
        Track::new(key, &self.blob_key, self.duration_seconds)
    }
}

/// Response to an upload request: where the payload goes and how to put it there.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTicket {
    pub blob_key: String,
    pub upload_url: Url,
    pub expires_at: jiff::Timestamp,
}
