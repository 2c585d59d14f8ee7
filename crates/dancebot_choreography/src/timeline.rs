// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-length timeline of beat slots.

use crate::beat_grid::BeatGrid;
use crate::descriptor::SequenceHandle;
use crate::payload::BeatPayload;
use serde::{Deserialize, Serialize};

/// One beat on a timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot<P> {
    position: usize,
    sample_offset: u64,
    sequence_handle: Option<SequenceHandle>,
    payload: P,
}

impl<P: BeatPayload> Slot<P> {
    fn new(position: usize, sample_offset: u64) -> Self {
        Self {
            position,
            sample_offset,
            sequence_handle: None,
            payload: P::default_payload(),
        }
    }

    /// Beat index on the timeline
    pub fn position(&self) -> usize {
        self.position
    }

    /// Sample offset of the beat in the song
    pub fn sample_offset(&self) -> u64 {
        self.sample_offset
    }

    /// Sequence this slot belongs to, if any
    pub fn sequence_handle(&self) -> Option<SequenceHandle> {
        self.sequence_handle
    }

    /// Current properties
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Whether the slot belongs to no sequence
    pub fn is_free(&self) -> bool {
        self.sequence_handle.is_none()
    }

    /// Whether a sequence built under `handle` may take this slot
    pub fn is_free_for(&self, handle: SequenceHandle) -> bool {
        match self.sequence_handle {
            None => true,
            Some(owner) => owner == handle,
        }
    }

    /// Tag shown by the list renderer; unassigned slots have none
    pub fn color_tag(&self) -> Option<char> {
        self.sequence_handle.and_then(|_| self.payload.color_tag())
    }

    /// Color shown by the list renderer
    pub fn color(&self) -> [u8; 3] {
        if self.is_free() {
            P::KIND.default_color()
        } else {
            self.payload.color()
        }
    }

    pub(crate) fn assign(&mut self, handle: SequenceHandle, payload: &P) {
        self.sequence_handle = Some(handle);
        self.payload.apply_payload(payload);
    }

    pub(crate) fn set_payload(&mut self, payload: &P) {
        self.payload.apply_payload(payload);
    }

    pub(crate) fn reset(&mut self) {
        self.sequence_handle = None;
        self.payload = P::default_payload();
    }
}

/// Owning arena of slots, one per detected beat.
///
/// The slot count is fixed at construction; slots are mutated in place and
/// never added or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline<P> {
    slots: Vec<Slot<P>>,
}

impl<P: BeatPayload> Timeline<P> {
    /// Create a timeline with one unassigned slot per beat
    pub fn new(beats: &BeatGrid) -> Self {
        let slots = beats
            .offsets()
            .iter()
            .enumerate()
            .map(|(position, &offset)| Slot::new(position, offset))
            .collect();
        Self { slots }
    }

    /// Create a timeline of `len` slots without sample offsets
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: (0..len).map(|position| Slot::new(position, 0)).collect(),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the timeline has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get a slot
    pub fn slot(&self, position: usize) -> Option<&Slot<P>> {
        self.slots.get(position)
    }

    /// All slots, in position order
    pub fn slots(&self) -> &[Slot<P>] {
        &self.slots
    }

    /// Number of slots that belong to a sequence
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    pub(crate) fn slot_mut(&mut self, position: usize) -> Option<&mut Slot<P>> {
        self.slots.get_mut(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{BeatProperties, MotionPayload, SlotKind};

    #[test]
    fn test_timeline_from_beats() {
        let grid = BeatGrid::new(vec![0, 512, 1024]);
        let timeline: Timeline<MotionPayload> = Timeline::new(&grid);

        assert_eq!(timeline.len(), 3);
        let slot = timeline.slot(2).unwrap();
        assert_eq!(slot.position(), 2);
        assert_eq!(slot.sample_offset(), 1024);
        assert!(slot.is_free());
        assert_eq!(slot.payload(), &MotionPayload::default());
        assert!(timeline.slot(3).is_none());
    }

    #[test]
    fn test_assign_and_reset() {
        let mut timeline: Timeline<MotionPayload> = Timeline::with_len(4);
        let handle = SequenceHandle::new();
        let payload = MotionPayload::new(BeatProperties::new(1, 2, 3), 4, 5);

        timeline.slot_mut(1).unwrap().assign(handle, &payload);
        let slot = timeline.slot(1).unwrap();
        assert_eq!(slot.sequence_handle(), Some(handle));
        assert_eq!(slot.payload(), &payload);
        assert_eq!(slot.color_tag(), Some('P'));
        assert_eq!(timeline.assigned_count(), 1);

        timeline.slot_mut(1).unwrap().reset();
        let slot = timeline.slot(1).unwrap();
        assert!(slot.is_free());
        assert_eq!(slot.color_tag(), None);
        assert_eq!(slot.color(), SlotKind::Motion.default_color());
    }

    #[test]
    fn test_free_for_same_handle_only() {
        let mut timeline: Timeline<MotionPayload> = Timeline::with_len(1);
        let owner = SequenceHandle::new();
        timeline.slot_mut(0).unwrap().assign(owner, &MotionPayload::default());

        let slot = timeline.slot(0).unwrap();
        assert!(slot.is_free_for(owner));
        assert!(!slot.is_free_for(SequenceHandle::new()));
    }
}
