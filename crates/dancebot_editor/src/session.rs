// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted editing sessions.
//!
//! A session stands in for the interactive editor: it names a song, its
//! detected beats, and the menu selections a user committed, in order.

use dancebot_choreography::{
    BeatGrid, BeatProperties, EditError, EditOutcome, EditorContext, LightPayload, MotionPayload,
    MusicFile, SequenceDescriptor, SlotKind, LIGHT_CHANNELS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session loading errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid session
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// One committed menu selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScriptedEdit {
    /// Light menu saved on a slot
    Light {
        /// Edited slot
        position: usize,
        /// Menu indices
        properties: BeatProperties,
        /// Channel toggles
        switches: [bool; LIGHT_CHANNELS],
    },
    /// Motion menu saved on a slot
    Motion {
        /// Edited slot
        position: usize,
        /// Menu indices
        properties: BeatProperties,
        /// Left wheel velocity index
        velocity_left_idx: usize,
        /// Right wheel velocity index
        velocity_right_idx: usize,
    },
    /// Sequence under a slot cleared
    Clear {
        /// Timeline to clear on
        kind: SlotKind,
        /// Any slot of the sequence
        position: usize,
    },
}

/// Result of replaying one edit
#[derive(Debug)]
pub enum Replayed {
    /// A sequence was created or updated
    Edited(EditOutcome),
    /// A sequence was removed
    Cleared(SequenceDescriptor),
}

impl ScriptedEdit {
    /// Apply this edit to the context
    pub fn apply(&self, ctx: &mut EditorContext) -> Result<Replayed, EditError> {
        match self {
            Self::Light {
                position,
                properties,
                switches,
            } => ctx
                .apply_selection(*position, LightPayload::new(*properties, *switches))
                .map(Replayed::Edited),
            Self::Motion {
                position,
                properties,
                velocity_left_idx,
                velocity_right_idx,
            } => ctx
                .apply_selection(
                    *position,
                    MotionPayload::new(*properties, *velocity_left_idx, *velocity_right_idx),
                )
                .map(Replayed::Edited),
            Self::Clear { kind, position } => ctx
                .coordinator_mut()
                .remove_at(*kind, *position)
                .map(Replayed::Cleared),
        }
    }
}

/// A song plus the edits made on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Song title
    pub title: String,
    /// Song artist
    pub artist: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Detected beat sample offsets
    pub beats: Vec<u64>,
    /// Edits, in commit order
    pub edits: Vec<ScriptedEdit>,
}

impl Session {
    /// Load a session file
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Song description for the editor context
    pub fn music_file(&self) -> MusicFile {
        MusicFile::new(
            self.title.clone(),
            self.artist.clone(),
            self.duration_ms,
            self.sample_rate,
            BeatGrid::new(self.beats.clone()),
        )
    }

    /// Sixteen beats at 120 BPM with a few overlapping edits
    pub fn demo() -> Self {
        let sample_rate = 44_100;
        let beats = (0..16).map(|i| i * u64::from(sample_rate) / 2).collect();
        let mut switches = [false; LIGHT_CHANNELS];
        switches[0] = true;
        switches[7] = true;

        Self {
            title: "Demo".to_string(),
            artist: "DanceBot".to_string(),
            duration_ms: 8_000,
            sample_rate,
            beats,
            edits: vec![
                ScriptedEdit::Motion {
                    position: 0,
                    properties: BeatProperties::new(0, 2, 2),
                    velocity_left_idx: 5,
                    velocity_right_idx: 5,
                },
                ScriptedEdit::Motion {
                    position: 6,
                    properties: BeatProperties::new(1, 2, 3),
                    velocity_left_idx: 8,
                    velocity_right_idx: 2,
                },
                ScriptedEdit::Motion {
                    position: 2,
                    properties: BeatProperties::new(2, 1, 4),
                    velocity_left_idx: 3,
                    velocity_right_idx: 3,
                },
                ScriptedEdit::Light {
                    position: 4,
                    properties: BeatProperties::new(0, 1, 3),
                    switches,
                },
                ScriptedEdit::Light {
                    position: 10,
                    properties: BeatProperties::new(2, 0, 1),
                    switches: [true; LIGHT_CHANNELS],
                },
                ScriptedEdit::Clear {
                    kind: SlotKind::Motion,
                    position: 7,
                },
            ],
        }
    }
}
