// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor context: settings, the loaded song, and the choreography.

use crate::beat_grid::{BeatGrid, MusicFile};
use crate::coordinator::{ChoreographyCoordinator, EditError, EditOutcome, EditRequest};
use crate::payload::SlotPayload;
use crate::settings::ChoreographySettings;

/// Everything one editing session needs, built once per loaded song
#[derive(Debug, Clone)]
pub struct EditorContext {
    settings: ChoreographySettings,
    music: Option<MusicFile>,
    coordinator: ChoreographyCoordinator,
}

impl EditorContext {
    /// Create a context for a song whose beats have been detected
    pub fn new(settings: ChoreographySettings, music: MusicFile) -> Self {
        let coordinator = ChoreographyCoordinator::new(&music.beats);
        tracing::info!(
            "Choreography for '{}' by {} ({}, {} beats)",
            music.title,
            music.artist,
            music.duration_readable(),
            music.beats.len()
        );
        Self {
            settings,
            music: Some(music),
            coordinator,
        }
    }

    /// Create a context from bare beat offsets, without song metadata
    pub fn from_beats(settings: ChoreographySettings, beats: BeatGrid) -> Self {
        Self {
            settings,
            music: None,
            coordinator: ChoreographyCoordinator::new(&beats),
        }
    }

    /// Editor settings
    pub fn settings(&self) -> &ChoreographySettings {
        &self.settings
    }

    /// Loaded song, if any
    pub fn music(&self) -> Option<&MusicFile> {
        self.music.as_ref()
    }

    /// Choreography state
    pub fn coordinator(&self) -> &ChoreographyCoordinator {
        &self.coordinator
    }

    /// Mutable choreography state
    pub fn coordinator_mut(&mut self) -> &mut ChoreographyCoordinator {
        &mut self.coordinator
    }

    /// Apply a menu selection: the payload's length index is resolved
    /// through the length table before the edit is dispatched
    pub fn apply_selection(
        &mut self,
        position: usize,
        payload: impl Into<SlotPayload>,
    ) -> Result<EditOutcome, EditError> {
        let payload = payload.into();
        let length_idx = payload.properties().length_idx;
        let requested_length = self
            .settings
            .length_at(length_idx)
            .ok_or(EditError::UnknownLengthChoice(length_idx))?;

        self.coordinator
            .apply_edit(EditRequest::new(position, requested_length, payload))
    }

    /// Beat under the playhead after `micros` of playback
    pub fn beat_at_micros(&self, micros: u64) -> Option<usize> {
        self.music.as_ref()?.beat_at_micros(micros)
    }
}
