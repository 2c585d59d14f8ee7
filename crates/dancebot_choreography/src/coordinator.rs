// SPDX-License-Identifier: MIT OR Apache-2.0
//! Routes property edits to the light or motion registry.

use crate::beat_grid::BeatGrid;
use crate::descriptor::{SequenceDescriptor, SequenceHandle};
use crate::payload::{BeatPayload, LightPayload, MotionPayload, SlotKind, SlotPayload};
use crate::registry::{SequenceError, SequenceRegistry};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Error raised while applying an edit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Registry rejected the operation
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Edited slot does not exist
    #[error("Slot {position} is outside the timeline (length {len})")]
    SlotOutOfRange {
        /// Edited position
        position: usize,
        /// Timeline length
        len: usize,
    },

    /// Edited slot belongs to no sequence
    #[error("Slot {0} is not part of a dance sequence")]
    Unassigned(usize),

    /// Length index has no entry in the length table
    #[error("Unknown sequence length choice: {0}")]
    UnknownLengthChoice(usize),
}

/// Result type for edit operations
pub type Result<T> = std::result::Result<T, EditError>;

/// A committed property edit for one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    /// Edited slot
    pub position: usize,
    /// Length the user picked
    pub requested_length: usize,
    /// New properties; the variant selects the timeline
    pub payload: SlotPayload,
}

impl EditRequest {
    /// Create an edit request
    pub fn new(position: usize, requested_length: usize, payload: impl Into<SlotPayload>) -> Self {
        Self {
            position,
            requested_length,
            payload: payload.into(),
        }
    }

    /// Timeline this edit targets
    pub fn kind(&self) -> SlotKind {
        self.payload.kind()
    }
}

/// What an edit did to the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// A new sequence was started
    Created,
    /// The enclosing sequence was rebuilt
    Updated,
}

/// Outcome of an applied edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Create or update
    pub action: EditAction,
    /// Resulting sequence
    pub descriptor: SequenceDescriptor,
}

impl EditOutcome {
    /// Whether the sequence came out shorter than requested
    pub fn clamped(&self) -> bool {
        self.descriptor.is_clamped()
    }
}

/// Kind-erased row for the list renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    /// Beat index
    pub position: usize,
    /// Owning sequence
    pub handle: Option<SequenceHandle>,
    /// Motion tag
    pub color_tag: Option<char>,
    /// Display color
    pub color: [u8; 3],
}

/// Owns the light and motion registries and dispatches edits between them
#[derive(Debug, Clone)]
pub struct ChoreographyCoordinator {
    lights: SequenceRegistry<LightPayload>,
    motions: SequenceRegistry<MotionPayload>,
}

impl ChoreographyCoordinator {
    /// Build both timelines from the detected beats
    pub fn new(beats: &BeatGrid) -> Self {
        Self {
            lights: SequenceRegistry::new(Timeline::new(beats)),
            motions: SequenceRegistry::new(Timeline::new(beats)),
        }
    }

    /// Light registry
    pub fn lights(&self) -> &SequenceRegistry<LightPayload> {
        &self.lights
    }

    /// Motion registry
    pub fn motions(&self) -> &SequenceRegistry<MotionPayload> {
        &self.motions
    }

    /// Number of beats on each timeline
    pub fn beat_count(&self) -> usize {
        self.lights.timeline().len()
    }

    /// Apply a committed edit.
    ///
    /// An unassigned slot starts a new sequence; a slot inside a sequence
    /// updates that sequence from its start.
    pub fn apply_edit(&mut self, request: EditRequest) -> Result<EditOutcome> {
        let EditRequest {
            position,
            requested_length,
            payload,
        } = request;

        match payload {
            SlotPayload::Light(p) => dispatch(&mut self.lights, position, requested_length, &p),
            SlotPayload::Motion(p) => dispatch(&mut self.motions, position, requested_length, &p),
        }
    }

    /// Remove the sequence that owns the slot at `position`
    pub fn remove_at(&mut self, kind: SlotKind, position: usize) -> Result<SequenceDescriptor> {
        match kind {
            SlotKind::Light => remove_owner(&mut self.lights, position),
            SlotKind::Motion => remove_owner(&mut self.motions, position),
        }
    }

    /// Look up a live sequence on one timeline
    pub fn get_descriptor(&self, kind: SlotKind, handle: SequenceHandle) -> Result<SequenceDescriptor> {
        let descriptor = match kind {
            SlotKind::Light => self.lights.get_descriptor(handle)?,
            SlotKind::Motion => self.motions.get_descriptor(handle)?,
        };
        Ok(*descriptor)
    }

    /// Rows of one timeline for the list renderer
    pub fn slot_views(&self, kind: SlotKind) -> Vec<SlotView> {
        match kind {
            SlotKind::Light => views(&self.lights),
            SlotKind::Motion => views(&self.motions),
        }
    }
}

fn slot_in_range<P: BeatPayload>(
    registry: &SequenceRegistry<P>,
    position: usize,
) -> Result<Option<SequenceHandle>> {
    let len = registry.timeline().len();
    let slot = registry
        .timeline()
        .slot(position)
        .ok_or(EditError::SlotOutOfRange { position, len })?;
    Ok(slot.sequence_handle())
}

fn dispatch<P: BeatPayload>(
    registry: &mut SequenceRegistry<P>,
    position: usize,
    requested_length: usize,
    payload: &P,
) -> Result<EditOutcome> {
    let (action, handle) = match slot_in_range(registry, position)? {
        None => (
            EditAction::Created,
            registry.create_sequence(position, requested_length, payload)?,
        ),
        Some(handle) => {
            registry.update_sequence(handle, payload, requested_length)?;
            (EditAction::Updated, handle)
        }
    };

    Ok(EditOutcome {
        action,
        descriptor: *registry.get_descriptor(handle)?,
    })
}

fn remove_owner<P: BeatPayload>(
    registry: &mut SequenceRegistry<P>,
    position: usize,
) -> Result<SequenceDescriptor> {
    let handle = slot_in_range(registry, position)?.ok_or(EditError::Unassigned(position))?;
    let descriptor = *registry.get_descriptor(handle)?;
    registry.remove_sequence(handle)?;
    Ok(descriptor)
}

fn views<P: BeatPayload>(registry: &SequenceRegistry<P>) -> Vec<SlotView> {
    registry
        .slots()
        .iter()
        .map(|slot| SlotView {
            position: slot.position(),
            handle: slot.sequence_handle(),
            color_tag: slot.color_tag(),
            color: slot.color(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{BeatProperties, LIGHT_CHANNELS};

    fn coordinator(len: usize) -> ChoreographyCoordinator {
        ChoreographyCoordinator::new(&BeatGrid::new((0..len as u64).map(|i| i * 1000).collect()))
    }

    fn light(motion_idx: usize) -> LightPayload {
        LightPayload::new(BeatProperties::new(motion_idx, 0, 0), [true; LIGHT_CHANNELS])
    }

    fn motion(motion_idx: usize) -> MotionPayload {
        MotionPayload::new(BeatProperties::new(motion_idx, 0, 0), 1, 1)
    }

    #[test]
    fn test_edit_on_free_slot_creates() {
        let mut coord = coordinator(8);

        let outcome = coord.apply_edit(EditRequest::new(2, 3, light(0))).unwrap();

        assert_eq!(outcome.action, EditAction::Created);
        assert_eq!(outcome.descriptor.range(), 2..5);
        assert_eq!(coord.lights().len(), 1);
        assert!(coord.motions().is_empty());
    }

    #[test]
    fn test_edit_inside_sequence_updates_from_start() {
        let mut coord = coordinator(8);
        let first = coord.apply_edit(EditRequest::new(1, 4, motion(0))).unwrap();

        let outcome = coord.apply_edit(EditRequest::new(3, 2, motion(2))).unwrap();

        assert_eq!(outcome.action, EditAction::Updated);
        assert_eq!(outcome.descriptor.handle, first.descriptor.handle);
        assert_eq!(outcome.descriptor.range(), 1..3);
        let views = coord.slot_views(SlotKind::Motion);
        assert_eq!(views[1].color_tag, Some('T'));
        assert_eq!(views[2].color_tag, Some('T'));
        assert_eq!(views[3].color_tag, None);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut coord = coordinator(6);
        coord.apply_edit(EditRequest::new(0, 6, light(1))).unwrap();

        let outcome = coord.apply_edit(EditRequest::new(2, 2, motion(1))).unwrap();

        assert_eq!(outcome.action, EditAction::Created);
        assert_eq!(coord.lights().get_descriptor(coord.lights().handle_at(0).unwrap()).unwrap().length, 6);
        assert_eq!(coord.motions().handle_at(0), None);
    }

    #[test]
    fn test_clamped_outcome() {
        let mut coord = coordinator(4);
        let outcome = coord.apply_edit(EditRequest::new(2, 5, light(0))).unwrap();

        assert!(outcome.clamped());
        assert_eq!(outcome.descriptor.length, 2);
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut coord = coordinator(4);
        let err = coord.apply_edit(EditRequest::new(9, 1, light(0))).unwrap_err();
        assert_eq!(err, EditError::SlotOutOfRange { position: 9, len: 4 });
    }

    #[test]
    fn test_remove_at() {
        let mut coord = coordinator(6);
        let created = coord.apply_edit(EditRequest::new(1, 3, motion(0))).unwrap();

        let removed = coord.remove_at(SlotKind::Motion, 2).unwrap();
        assert_eq!(removed, created.descriptor);
        assert_eq!(coord.motions().timeline().assigned_count(), 0);

        assert_eq!(coord.remove_at(SlotKind::Motion, 2).unwrap_err(), EditError::Unassigned(2));
        assert_eq!(
            coord.get_descriptor(SlotKind::Motion, created.descriptor.handle).unwrap_err(),
            EditError::Sequence(SequenceError::NotFound(created.descriptor.handle))
        );
    }
}
