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

//! Catalog operations.
//!
//! [`Catalog`] ties a [`TrackStore`] to a [`BlobSigner`] and implements the
//! track lifecycle:
//!
//! 1. [`Catalog::request_upload`] reserves nothing, but refuses keys that
//!    already exist and hands out a signed upload URL.
//! 2. [`Catalog::submit_metadata`] records the track once its payload is
//!    uploaded. Resubmission overwrites.
//! 3. [`Catalog::list_tracks`] pages through the catalog, see [`scan`].
//! 4. [`Catalog::stream_url`] signs a download URL for playback.
//! 5. [`Catalog::delete_track`] removes the record.
//!
//! Writes are last-writer-wins; there is no versioning.

pub mod scan;

pub use self::scan::{Page, PageLimits, PageRequest};

use crate::{
    blob::{self, BlobSigner, SignedUrl},
    error::{CatalogError, Result},
    model::{Track, TrackKey, TrackMetadata, UploadTicket},
    store::TrackStore,
};

#[derive(Debug)]
pub struct Catalog<S, B> {
    store: S,
    signer: B,
    limits: PageLimits,
}

impl<S, B> Catalog<S, B>
where
    S: TrackStore,
    B: BlobSigner,
{
    pub fn new(store: S, signer: B) -> Self {
        Self::with_limits(store, signer, PageLimits::default())
    }

    pub fn with_limits(store: S, signer: B, limits: PageLimits) -> Self {
        Self {
            store,
            signer,
            limits,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads one page of tracks. See [`scan::scan_page`].
    pub fn list_tracks(&self, request: &PageRequest) -> Result<Page> {
        log::debug!(
            "Fetching tracks with limit: {:?}, cursor present: {}, search: {:?}",
            request.limit,
            request.cursor.is_some(),
            request.search
        );
        scan::scan_page(&self.store, self.limits, request)
    }

    pub fn get_track(&self, artist: &str, song: &str) -> Result<Track> {
        let key = TrackKey::new(artist, song)?;
        self.fetch(&key)?.ok_or_else(|| not_found(&key))
    }

    /// Issues an upload URL for a track that is not yet in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Duplicate`] if a track with the same key
    /// exists. The existing record is left untouched.
    pub fn request_upload(&self, artist: &str, song: &str) -> Result<UploadTicket> {
        let key = TrackKey::new(artist, song)?;
        log::info!("Generating upload URL for {key}");

        if self.fetch(&key)?.is_some() {
            log::warn!("Duplicate song detected: {key}");
            return Err(CatalogError::Duplicate {
                artist: key.artist().to_owned(),
                song: key.song().to_owned(),
            });
        }

        let blob_key = blob::blob_key_for(&key);
        let signed = self.signer.issue_upload_url(&blob_key)?;
        log::debug!("Upload URL generated for key: {blob_key}");

        Ok(UploadTicket {
            blob_key,
            upload_url: signed.url,
            expires_at: signed.expires_at,
        })
    }

    /// Records the metadata of an uploaded track, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlobKeyMismatch`] when overwriting a track
    /// whose blob key differs from the submitted one.
    pub fn submit_metadata(&self, metadata: TrackMetadata) -> Result<Track> {
        let track = metadata.into_track()?;
        log::info!("Saving metadata for {}", track.key());

        if let Some(existing) = self.fetch(&track.key())? {
            ensure_same_blob(&existing, &track)?;
        }

        self.store.put(&track)?;
        Ok(track)
    }

    /// Overwrites the metadata of an existing track.
    pub fn update_track(&self, metadata: TrackMetadata) -> Result<Track> {
        let track = metadata.into_track()?;
        let key = track.key();
        log::info!("Updating {key}");

        let existing = self.fetch(&key)?.ok_or_else(|| not_found(&key))?;
        ensure_same_blob(&existing, &track)?;

        self.store.put(&track)?;
        Ok(track)
    }

    pub fn delete_track(&self, artist: &str, song: &str) -> Result<()> {
        let key = TrackKey::new(artist, song)?;
        log::info!("Deleting {key}");

        if self.store.delete(&key)? {
            Ok(())
        } else {
            Err(not_found(&key))
        }
    }

    /// Issues a download URL for the payload of a catalogued track.
    pub fn stream_url(&self, artist: &str, song: &str) -> Result<SignedUrl> {
        let track = self.get_track(artist, song)?;
        self.download_url(track.blob_key())
    }

    /// Issues a download URL for a blob key without consulting the catalog.
    pub fn download_url(&self, blob_key: &str) -> Result<SignedUrl> {
        let blob_key = blob_key.trim();
        if blob_key.is_empty() {
            return Err(CatalogError::InvalidBlobKey);
        }

        log::debug!("Generating stream URL for key: {blob_key}");
        Ok(self.signer.issue_download_url(blob_key)?)
    }

    fn fetch(&self, key: &TrackKey) -> Result<Option<Track>> {
        Ok(self.store.get(key)?)
    }
}

fn not_found(key: &TrackKey) -> CatalogError {
    CatalogError::NotFound {
        artist: key.artist().to_owned(),
        song: key.song().to_owned(),
    }
}

fn ensure_same_blob(existing: &Track, submitted: &Track) -> Result<()> {
    if existing.blob_key() == submitted.blob_key() {
        Ok(())
    } else {
        Err(CatalogError::BlobKeyMismatch {
            artist: existing.artist().to_owned(),
            song: existing.song().to_owned(),
        })
    }
}
