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

//! Pagination cursor codec.
//!
//! A cursor token is the opaque, URL-safe form of the last [`TrackKey`]
//! examined by a page scan. Each key component is escaped on its own by
//! serializing the pair as a two element JSON array, and the result is
//! encoded as unpadded URL-safe base64. Names containing quotes, commas or
//! any other separator therefore never produce ambiguous tokens.
//!
//! The token format is not a stable interface and may change between
//! versions. Tokens come from clients and are untrusted: [`decode`] maps
//! every malformed input to `None`.

use base64::Engine as _;

use crate::model::TrackKey;

const TOKEN_ENGINE: base64::engine::GeneralPurpose =
    base64::engine::general_purpose::URL_SAFE_NO_PAD;

// Upper bound for untrusted token input, checked before decoding.
pub const MAX_CURSOR_TOKEN_LEN: usize = 8 * 1024;

/// Encodes the resume position of a page scan as an opaque token.
#[must_use]
pub fn encode(key: &TrackKey) -> String {
    let json = serde_json::json!([key.artist(), key.song()]);
    TOKEN_ENGINE.encode(json.to_string())
}

/// Decodes a token produced by [`encode`].
///
/// Returns `None` when the token is blank, oversized, not base64, not a JSON
/// array of exactly two strings, or when either component is blank.
/// Surrounding whitespace is ignored.
#[must_use]
pub fn decode(token: &str) -> Option<TrackKey> {
    let token = token.trim();
    if token.is_empty() || token.len() > MAX_CURSOR_TOKEN_LEN {
        return None;
    }

    let bytes = TOKEN_ENGINE.decode(token).ok()?;
    let (artist, song): (String, String) = serde_json::from_slice(&bytes).ok()?;

    TrackKey::new(artist, song).ok()
}
