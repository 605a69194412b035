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

//! Local audio file inspection.
//!
//! Reads the duration and, when tagged, the artist and title of an audio
//! file with `lofty`, so metadata submissions can be filled in from the file
//! that is about to be uploaded.

use std::path::Path;

use anyhow::{Context, Result};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::ItemKey;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbedAudio {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub duration_seconds: u32,
}

/// Probes an audio file for its duration and tags.
///
/// The album artist is preferred over the track artist when both are
/// tagged. Missing tags are not an error.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its format is not
/// recognised.
pub fn probe_audio_file(path: &Path) -> Result<ProbedAudio> {
    let tagged_file = Probe::open(path)
        .and_then(|p| p.read())
        .with_context(|| format!("Failed to read audio file {}", path.display()))?;

    let duration_seconds = u32::try_from(tagged_file.properties().duration().as_secs())
        .context("Audio duration out of range")?;

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        log::debug!("No tags in {}", path.display());
        return Ok(ProbedAudio {
            duration_seconds,
            ..ProbedAudio::default()
        });
    };

    let album_artist = tag
        .get(ItemKey::AlbumArtist)
        .and_then(|item| item.value().text())
        .map(str::to_string);
    let artist = album_artist.or_else(|| tag.artist().map(|a| a.to_string()));

    Ok(ProbedAudio {
        artist,
        title: tag.title().map(|t| t.to_string()),
        duration_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_audio_file(&dir.path().join("absent.mp3")).is_err());
    }

    #[test]
    fn non_audio_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"definitely not mpeg audio").unwrap();
        assert!(probe_audio_file(&path).is_err());
    }
}
