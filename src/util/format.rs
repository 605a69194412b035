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

//! Plain text rendering of catalog records for terminal output.

use crate::model::Track;

/// Formats a duration in seconds as `MM:SS`, or `H:MM:SS` from one hour on.
///
/// Unknown durations render as `--:--` so listings stay aligned.
///
/// # Examples
///
/// ```
/// use musify::util::format::format_duration;
///
/// assert_eq!(format_duration(Some(65)), "01:05");
/// assert_eq!(format_duration(Some(3725)), "1:02:05");
/// assert_eq!(format_duration(None), "--:--");
/// ```
pub fn format_duration(total_seconds: Option<u32>) -> String {
    let Some(total_seconds) = total_seconds else {
        return "--:--".to_string();
    };

    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// One listing line: `artist - song [duration]`.
pub fn format_track_line(track: &Track) -> String {
    format!(
        "{} - {} [{}]",
        track.artist(),
        track.song(),
        format_duration(track.duration_seconds())
    )
}
