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

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use musify::{
    Catalog, PageLimits, Track, TrackKey,
    blob::KeyedUrlSigner,
    config::BlobConfig,
    db::SqliteTrackStore,
    store::{ScanOutput, ScanRequest, StoreError, TrackStore},
};

pub type TestCatalog = Catalog<SqliteTrackStore, KeyedUrlSigner>;

pub fn signer() -> KeyedUrlSigner {
    KeyedUrlSigner::new(&BlobConfig {
        signing_secret: "integration test secret".to_string(),
        ..BlobConfig::default()
    })
    .unwrap()
}

pub fn track(artist: &str, song: &str) -> Track {
    let key = TrackKey::new(artist, song).unwrap();
    Track::new(key, format!("tracks/{artist}/{song}.mp3"), Some(200)).unwrap()
}

/// In-memory catalog holding the given `(artist, song)` pairs.
pub fn catalog_with(keys: &[(&str, &str)]) -> TestCatalog {
    let store = SqliteTrackStore::open_in_memory().unwrap();
    for (artist, song) in keys {
        store.put(&track(artist, song)).unwrap();
    }
    Catalog::with_limits(store, signer(), PageLimits::default())
}

pub fn keys_of(tracks: &[Track]) -> Vec<(&str, &str)> {
    tracks.iter().map(|t| (t.artist(), t.song())).collect()
}

/// A store whose every call fails, standing in for an unreachable backend.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl TrackStore for UnavailableStore {
    fn get(&self, _key: &TrackKey) -> Result<Option<Track>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn put(&self, _track: &Track) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn delete(&self, _key: &TrackKey) -> Result<bool, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn scan(&self, _request: &ScanRequest) -> Result<ScanOutput, StoreError> {
        Err(StoreError::Poisoned)
    }
}
