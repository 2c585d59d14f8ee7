// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dance sequence allocation over one timeline.
//!
//! A [`SequenceRegistry`] owns a [`Timeline`] and the descriptors of every
//! live sequence on it. Every slot belongs to at most one sequence; a
//! sequence that would run into a neighbour is silently shortened.

use crate::descriptor::{SequenceDescriptor, SequenceHandle};
use crate::payload::BeatPayload;
use crate::timeline::{Slot, Timeline};
use indexmap::IndexMap;

/// Error raised by registry operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// No live sequence with this handle
    #[error("Sequence not found: {0}")]
    NotFound(SequenceHandle),

    /// Start position outside the timeline
    #[error("Position {position} is outside the timeline (length {len})")]
    OutOfRange {
        /// Requested position
        position: usize,
        /// Timeline length
        len: usize,
    },

    /// Requested length of zero
    #[error("Sequence length must be at least 1")]
    InvalidLength,

    /// Generated handle is already live
    #[error("Sequence handle collision: {0}")]
    HandleCollision(SequenceHandle),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, SequenceError>;

/// Sequence allocator for one slot kind
#[derive(Debug, Clone)]
pub struct SequenceRegistry<P> {
    timeline: Timeline<P>,
    sequences: IndexMap<SequenceHandle, SequenceDescriptor>,
}

impl<P: BeatPayload> SequenceRegistry<P> {
    /// Create a registry bound to `timeline`
    pub fn new(timeline: Timeline<P>) -> Self {
        Self {
            timeline,
            sequences: IndexMap::new(),
        }
    }

    /// Read-only view of the timeline
    pub fn timeline(&self) -> &Timeline<P> {
        &self.timeline
    }

    /// All slots, in position order
    pub fn slots(&self) -> &[Slot<P>] {
        self.timeline.slots()
    }

    /// Number of live sequences
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether there are no live sequences
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Get a live descriptor
    pub fn get_descriptor(&self, handle: SequenceHandle) -> Result<&SequenceDescriptor> {
        self.sequences
            .get(&handle)
            .ok_or(SequenceError::NotFound(handle))
    }

    /// All live descriptors, in creation order
    pub fn descriptors(&self) -> impl Iterator<Item = &SequenceDescriptor> {
        self.sequences.values()
    }

    /// Handle of the sequence the slot at `position` belongs to
    pub fn handle_at(&self, position: usize) -> Option<SequenceHandle> {
        self.timeline.slot(position)?.sequence_handle()
    }

    /// Descriptor of the sequence the slot at `position` belongs to
    pub fn sequence_at(&self, position: usize) -> Option<&SequenceDescriptor> {
        self.sequences.get(&self.handle_at(position)?)
    }

    /// Start a new sequence at `start`.
    ///
    /// The run grows forward over free slots and stops at the first slot
    /// owned by another sequence or at the end of the timeline. The stored
    /// descriptor's `length` is the authoritative, possibly clamped, length.
    pub fn create_sequence(
        &mut self,
        start: usize,
        requested_length: usize,
        payload: &P,
    ) -> Result<SequenceHandle> {
        self.create_with_handle(SequenceHandle::new(), start, requested_length, payload)
    }

    /// Change the payload and length of a live sequence.
    ///
    /// The tail of the old run is released first, so slots vacated by
    /// shrinking become available to neighbours, then the run is rebuilt
    /// from its start under the same handle.
    pub fn update_sequence(
        &mut self,
        handle: SequenceHandle,
        payload: &P,
        requested_length: usize,
    ) -> Result<()> {
        let descriptor = *self.get_descriptor(handle)?;
        if requested_length == 0 {
            return Err(SequenceError::InvalidLength);
        }

        if let Some(slot) = self.timeline.slot_mut(descriptor.start) {
            slot.set_payload(payload);
        }
        self.remove_range(handle, descriptor.start + 1, descriptor.end());
        self.create_with_handle(handle, descriptor.start, requested_length, payload)?;

        tracing::debug!(
            "Updated {:?} sequence {} at {}: length {} -> {}",
            P::KIND,
            handle,
            descriptor.start,
            descriptor.length,
            self.sequences.get(&handle).map_or(0, |d| d.length)
        );
        Ok(())
    }

    /// Delete a live sequence and reset every slot it occupied
    pub fn remove_sequence(&mut self, handle: SequenceHandle) -> Result<()> {
        let descriptor = *self.get_descriptor(handle)?;
        self.remove_range(handle, descriptor.start, descriptor.end());
        tracing::debug!(
            "Removed {:?} sequence {} at {}..{}",
            P::KIND,
            handle,
            descriptor.start,
            descriptor.end()
        );
        Ok(())
    }

    /// Drop `handle` from the registry and reset slots `start..end`.
    ///
    /// Does not look at the descriptor bounds and does nothing to the map if
    /// the handle is already gone. `end` is clamped to the timeline.
    pub fn remove_range(&mut self, handle: SequenceHandle, start: usize, end: usize) {
        self.sequences.shift_remove(&handle);

        let end = end.min(self.timeline.len());
        for position in start..end {
            if let Some(slot) = self.timeline.slot_mut(position) {
                slot.reset();
            }
        }
    }

    pub(crate) fn create_with_handle(
        &mut self,
        handle: SequenceHandle,
        start: usize,
        requested_length: usize,
        payload: &P,
    ) -> Result<SequenceHandle> {
        let len = self.timeline.len();
        if start >= len {
            return Err(SequenceError::OutOfRange { position: start, len });
        }
        if requested_length == 0 {
            return Err(SequenceError::InvalidLength);
        }
        if self.sequences.contains_key(&handle) {
            tracing::warn!("Refusing to create {:?} sequence: handle {} is live", P::KIND, handle);
            return Err(SequenceError::HandleCollision(handle));
        }

        if let Some(owner) = self.handle_at(start).filter(|owner| *owner != handle) {
            tracing::warn!(
                "Creating {:?} sequence at {} which already belongs to {}",
                P::KIND,
                start,
                owner
            );
        }

        let length = self.max_length(handle, start, requested_length);
        for position in start..start + length {
            if let Some(slot) = self.timeline.slot_mut(position) {
                slot.assign(handle, payload);
            }
        }

        self.sequences.insert(
            handle,
            SequenceDescriptor::new(handle, start, requested_length, length),
        );

        if length < requested_length {
            tracing::info!(
                "{:?} sequence at {} clamped from {} to {}",
                P::KIND,
                start,
                requested_length,
                length
            );
        }
        tracing::debug!("Created {:?} sequence {} at {} (length {})", P::KIND, handle, start, length);

        Ok(handle)
    }

    /// Longest run from `start` that stays clear of other sequences, capped
    /// at `requested_length`
    fn max_length(&self, handle: SequenceHandle, start: usize, requested_length: usize) -> usize {
        // The start slot always belongs to the new run
        let mut length = 1;
        while length < requested_length {
            match self.timeline.slot(start + length) {
                Some(slot) if slot.is_free_for(handle) => length += 1,
                _ => break,
            }
        }
        length
    }
}
