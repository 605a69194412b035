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

//! Paginated, filterable catalog scan.
//!
//! Each page is exactly one bounded read of the store: decode the cursor,
//! read at most `limit` records after it, keep the ones matching the search
//! text, and turn the last examined key into the next cursor.
//!
//! # Sparse pages
//!
//! The search filter only sees the records of the current read window. A
//! page can therefore hold fewer than `limit` items, or none at all, while
//! further matches exist. Only an absent `next_cursor` means that the
//! catalog is exhausted.
//!
//! # Consistency
//!
//! Pages are independent reads anchored at a key, not a snapshot. Records
//! written between two page fetches may be skipped or seen twice.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{
    cursor,
    error::{CatalogError, Result},
    model::Track,
    store::{ScanFilter, ScanRequest, TrackStore},
};

pub const DEFAULT_PAGE_LIMIT: NonZeroU32 = NonZeroU32::new(20).unwrap();
pub const MAX_PAGE_LIMIT: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Page size policy.
///
/// An absent limit falls back to the default, a non-positive limit is
/// rejected and a limit above the maximum is clamped down to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default: NonZeroU32,
    max: NonZeroU32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_PAGE_LIMIT,
            max: MAX_PAGE_LIMIT,
        }
    }
}

impl PageLimits {
    /// Zero values fall back to the built-in limits. The default never
    /// exceeds the maximum.
    pub fn new(default: u32, max: u32) -> Self {
        let max = NonZeroU32::new(max).unwrap_or(MAX_PAGE_LIMIT);
        let default = NonZeroU32::new(default).unwrap_or(DEFAULT_PAGE_LIMIT).min(max);
        Self { default, max }
    }

    pub fn default_limit(&self) -> NonZeroU32 {
        self.default
    }

    pub fn max_limit(&self) -> NonZeroU32 {
        self.max
    }

    pub fn resolve(&self, requested: Option<i64>) -> Result<NonZeroU32> {
        let Some(requested) = requested else {
            return Ok(self.default);
        };
        if requested <= 0 {
            return Err(CatalogError::InvalidLimit(requested));
        }

        let max = i64::from(self.max.get());
        if requested >= max {
            return Ok(self.max);
        }

        // 0 < requested < max <= u32::MAX
        Ok(u32::try_from(requested)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(self.max))
    }
}

/// Query of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
    pub search: Option<String>,
}

impl PageRequest {
    /// Request for the page following `page`, keeping limit and search.
    ///
    /// Returns `None` when `page` was the last one.
    pub fn next(&self, page: &Page) -> Option<Self> {
        let cursor = page.next_cursor.clone()?;
        Some(Self {
            cursor: Some(cursor),
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<Track>,
    pub next_cursor: Option<String>,
}

impl Page {
    /// Whether the scan has reached the end of the catalog.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Reads one page of the catalog.
///
/// A malformed or stale cursor restarts the scan from the beginning instead
/// of failing. Store failures are returned as [`CatalogError::Store`] and
/// never reported as an empty page.
pub fn scan_page<S>(store: &S, limits: PageLimits, request: &PageRequest) -> Result<Page>
where
    S: TrackStore + ?Sized,
{
    let limit = limits.resolve(request.limit)?;

    let exclusive_start_key = request.cursor.as_deref().and_then(|token| {
        let key = cursor::decode(token);
        if key.is_none() && !token.trim().is_empty() {
            log::debug!("Ignoring malformed cursor, scanning from the start");
        }
        key
    });

    let filter = request.search.as_deref().and_then(ScanFilter::contains);

    let scan = ScanRequest {
        limit,
        exclusive_start_key,
        filter,
    };
    let output = store.scan(&scan).inspect_err(|e| {
        log::error!("Catalog scan failed: {e}");
    })?;

    let next_cursor = output.last_evaluated_key.as_ref().map(cursor::encode);

    log::debug!(
        "Page of {} tracks ({} examined), next cursor present: {}",
        output.items.len(),
        output.examined,
        next_cursor.is_some()
    );

    Ok(Page {
        items: output.items,
        next_cursor,
    })
}
