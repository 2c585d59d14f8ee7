// SPDX-License-Identifier: MIT OR Apache-2.0
//! Choreography engine for the DanceBot editor.
//!
//! This crate paints behaviour onto beat-indexed timelines:
//! - Light timeline (LED patterns and channel toggles)
//! - Motion timeline (motor patterns and wheel velocities)
//!
//! ## Architecture
//!
//! The engine is built on:
//! - One fixed-length slot arena per timeline, created from detected beats
//! - A sequence registry per timeline that keeps dance sequences disjoint
//! - A coordinator that routes each edit to the matching registry
//! - An editor context that owns settings, song and coordinator

pub mod beat_grid;
pub mod context;
pub mod coordinator;
pub mod descriptor;
pub mod payload;
pub mod registry;
pub mod settings;
pub mod timeline;

pub use beat_grid::{BeatGrid, MusicFile};
pub use context::EditorContext;
pub use coordinator::{
    ChoreographyCoordinator, EditAction, EditError, EditOutcome, EditRequest, SlotView,
};
pub use descriptor::{SequenceDescriptor, SequenceHandle};
pub use payload::{
    BeatPayload, BeatProperties, LightMotion, LightPayload, MotionPayload, MotorMotion, SlotKind,
    SlotPayload, LIGHT_CHANNELS,
};
pub use registry::{SequenceError, SequenceRegistry};
pub use settings::{ChoreographySettings, SettingsError};
pub use timeline::{Slot, Timeline};
