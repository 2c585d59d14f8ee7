// SPDX-License-Identifier: MIT OR Apache-2.0
//! Beat positions produced by beat detection, and the song they belong to.

use serde::{Deserialize, Serialize};

/// Ordered beat sample offsets, one per detected beat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatGrid {
    offsets: Vec<u64>,
}

impl BeatGrid {
    /// Create a grid from ascending sample offsets
    pub fn new(offsets: Vec<u64>) -> Self {
        Self { offsets }
    }

    /// Sample offsets, in beat order
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of beats
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether no beat was detected
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Beat that is playing at `sample`.
    ///
    /// This is the last beat whose offset is at or before `sample`; anything
    /// before the second beat maps to beat 0. `None` for an empty grid.
    pub fn beat_at_sample(&self, sample: u64) -> Option<usize> {
        let (_, rest) = self.offsets.split_first()?;
        Some(rest.partition_point(|&offset| offset <= sample))
    }
}

impl From<Vec<u64>> for BeatGrid {
    fn from(offsets: Vec<u64>) -> Self {
        Self::new(offsets)
    }
}

/// Metadata and beat grid of the selected song
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicFile {
    /// Song title
    pub title: String,
    /// Song artist
    pub artist: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Detected beats
    pub beats: BeatGrid,
}

impl MusicFile {
    /// Create a music file description
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_ms: u64,
        sample_rate: u32,
        beats: BeatGrid,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            duration_ms,
            sample_rate,
            beats,
        }
    }

    /// Duration as `m:ss`
    pub fn duration_readable(&self) -> String {
        let total_secs = self.duration_ms / 1000;
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// Sample index reached after `micros` of playback
    pub fn sample_at_micros(&self, micros: u64) -> u64 {
        let sample = u128::from(micros) * u128::from(self.sample_rate) / 1_000_000;
        u64::try_from(sample).unwrap_or(u64::MAX)
    }

    /// Beat that is playing after `micros` of playback
    pub fn beat_at_micros(&self, micros: u64) -> Option<usize> {
        self.beats.beat_at_sample(self.sample_at_micros(micros))
    }
}
