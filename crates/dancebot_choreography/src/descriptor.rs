// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dance sequence handles and descriptors.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use uuid::Uuid;

/// Unique identifier for a dance sequence.
///
/// Slots store this as a plain lookup key into their registry; it never
/// aliases the descriptor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceHandle(pub Uuid);

impl SequenceHandle {
    /// Create a new random sequence handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SequenceHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SequenceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live dance sequence: a contiguous run of slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDescriptor {
    /// Sequence handle
    pub handle: SequenceHandle,
    /// Position of the reference slot
    pub start: usize,
    /// Length the user asked for
    pub requested_length: usize,
    /// Length actually occupied after clamping
    pub length: usize,
}

impl SequenceDescriptor {
    /// Create a descriptor
    pub fn new(handle: SequenceHandle, start: usize, requested_length: usize, length: usize) -> Self {
        Self {
            handle,
            start,
            requested_length,
            length,
        }
    }

    /// One past the last occupied position
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Occupied positions
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// All occupied positions, in order
    pub fn element_indices(&self) -> Vec<usize> {
        self.range().collect()
    }

    /// Whether `position` lies inside this sequence
    pub fn contains(&self, position: usize) -> bool {
        self.range().contains(&position)
    }

    /// Whether `position` is occupied but not the last slot of the run
    pub fn is_middle_element(&self, position: usize) -> bool {
        position >= self.start && position + 1 < self.end()
    }

    /// Whether clamping cut this sequence short
    pub fn is_clamped(&self) -> bool {
        self.length < self.requested_length
    }

    /// Whether the two sequences share any position
    pub fn overlaps(&self, other: &SequenceDescriptor) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}
