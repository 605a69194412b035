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

//! Catalog error types.
//!
//! Every fallible catalog operation returns a [`CatalogError`]. Malformed
//! pagination cursors are deliberately absent from this list: they decode to
//! "no resume position" instead of failing the request.

use thiserror::Error;

use crate::{blob::SignError, store::StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{field} must not be empty")]
    InvalidKey { field: &'static str },

    #[error("blob key must not be empty")]
    InvalidBlobKey,

    #[error("page limit must be positive, got {0}")]
    InvalidLimit(i64),

    #[error("song with {artist} and {song} already exists")]
    Duplicate { artist: String, song: String },

    #[error("no song with {artist} and {song}")]
    NotFound { artist: String, song: String },

    #[error("blob key of {artist} - {song} cannot be changed")]
    BlobKeyMismatch { artist: String, song: String },

    #[error("catalog store failure")]
    Store(#[from] StoreError),

    #[error("failed to sign blob url")]
    Sign(#[from] SignError),
}

impl CatalogError {
    /// Whether the same request may succeed when issued again later.
    ///
    /// Only store failures qualify. The catalog never retries on its own,
    /// that decision belongs to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
