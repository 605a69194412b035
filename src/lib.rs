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

//! # Music track catalog.
//!
//! Metadata for audio tracks keyed by `(artist, song)`, with the audio
//! payloads kept in blob storage and reached through signed URLs.
//!
//! ## Architecture
//!
//! * [`catalog`] implements the operations, including the paginated,
//!   searchable scan in [`catalog::scan`].
//! * [`cursor`] turns scan positions into opaque continuation tokens.
//! * [`store`] is the key-value interface the catalog reads and writes
//!   through, implemented for SQLite in [`db`].
//! * [`blob`] issues signed upload and download URLs.

pub mod blob;
pub mod catalog;
pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod model;
pub mod store;
pub mod util;

pub use self::{
    catalog::{Catalog, Page, PageLimits, PageRequest},
    error::CatalogError,
    model::{Track, TrackKey, TrackMetadata},
};
