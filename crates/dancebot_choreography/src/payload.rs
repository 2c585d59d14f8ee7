// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property payloads carried by timeline slots.
//!
//! Each timeline holds exactly one payload kind. The allocator is generic
//! over [`BeatPayload`]; only the coordinator sees the closed
//! [`SlotPayload`] sum type and matches on it once.

use serde::{Deserialize, Serialize};

/// Number of light channels a light payload can toggle
pub const LIGHT_CHANNELS: usize = 8;

/// Kind of a timeline (and of every slot in it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// LED light choreography
    Light,
    /// Motor motion choreography
    Motion,
}

impl SlotKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Motion => "Motion",
        }
    }

    /// Color of an unassigned slot of this kind
    pub fn default_color(&self) -> [u8; 3] {
        match self {
            Self::Light => [60, 60, 70],
            Self::Motion => [70, 60, 60],
        }
    }
}

/// Motor motion patterns, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotorMotion {
    /// Drive straight
    Straight,
    /// Spin in place
    Spin,
    /// Twist left and right
    Twist,
    /// Move back and forth
    BackAndForth,
    /// Constant speed
    Constant,
    /// Stand still
    Wait,
}

impl MotorMotion {
    /// All motor motions, indexed by motion index
    pub const ALL: [MotorMotion; 6] = [
        Self::Straight,
        Self::Spin,
        Self::Twist,
        Self::BackAndForth,
        Self::Constant,
        Self::Wait,
    ];

    /// Resolve a motion index
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// One-letter tag shown on the timeline
    pub fn tag(&self) -> char {
        match self {
            Self::Straight => 'S',
            Self::Spin => 'P',
            Self::Twist => 'T',
            Self::BackAndForth => 'B',
            Self::Constant => 'C',
            Self::Wait => 'W',
        }
    }

    /// Timeline color
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Straight => [100, 150, 255],
            Self::Spin => [150, 255, 100],
            Self::Twist => [255, 200, 100],
            Self::BackAndForth => [200, 100, 255],
            Self::Constant => [255, 100, 150],
            Self::Wait => [150, 150, 150],
        }
    }
}

/// Light motion patterns, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightMotion {
    /// Running light
    KnightRider,
    /// Random channels
    Random,
    /// Alternate blinking
    Blink,
    /// All selected channels blink together
    SameBlink,
    /// Always on
    Constant,
}

impl LightMotion {
    /// All light motions, indexed by motion index
    pub const ALL: [LightMotion; 5] = [
        Self::KnightRider,
        Self::Random,
        Self::Blink,
        Self::SameBlink,
        Self::Constant,
    ];

    /// Resolve a motion index
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// One-letter tag shown on the timeline
    pub fn tag(&self) -> char {
        match self {
            Self::KnightRider => 'K',
            Self::Random => 'R',
            Self::Blink => 'B',
            Self::SameBlink => 'S',
            Self::Constant => 'C',
        }
    }

    /// Timeline color
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::KnightRider => [255, 80, 80],
            Self::Random => [255, 200, 60],
            Self::Blink => [80, 200, 255],
            Self::SameBlink => [120, 255, 160],
            Self::Constant => [240, 240, 240],
        }
    }
}

/// Menu indices shared by both payload kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeatProperties {
    /// Index into the motion table of the payload kind
    pub motion_idx: usize,
    /// Index into the frequency table
    pub frequency_idx: usize,
    /// Index into the sequence length table
    pub length_idx: usize,
}

impl BeatProperties {
    /// Create properties from menu indices
    pub fn new(motion_idx: usize, frequency_idx: usize, length_idx: usize) -> Self {
        Self {
            motion_idx,
            frequency_idx,
            length_idx,
        }
    }
}

/// Capability shared by every slot payload kind.
///
/// The registry only ever copies, resets and tags payloads through this
/// trait, so it never needs to know which kind it is allocating.
pub trait BeatPayload: Clone + PartialEq + std::fmt::Debug {
    /// Timeline kind this payload belongs to
    const KIND: SlotKind;

    /// Copy every property from `source` into `self`
    fn apply_payload(&mut self, source: &Self) {
        self.clone_from(source);
    }

    /// Payload of an unassigned slot
    fn default_payload() -> Self;

    /// Shared menu indices
    fn properties(&self) -> &BeatProperties;

    /// One-letter tag for the motion pattern, `None` if the index is unknown
    fn color_tag(&self) -> Option<char>;

    /// Timeline color for the motion pattern
    fn color(&self) -> [u8; 3];
}

/// LED light payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LightPayload {
    /// Shared menu indices
    pub properties: BeatProperties,
    /// Per-channel on/off toggles
    pub switches: [bool; LIGHT_CHANNELS],
}

impl LightPayload {
    /// Create a light payload
    pub fn new(properties: BeatProperties, switches: [bool; LIGHT_CHANNELS]) -> Self {
        Self {
            properties,
            switches,
        }
    }

    /// Resolved motion pattern
    pub fn motion(&self) -> Option<LightMotion> {
        LightMotion::from_index(self.properties.motion_idx)
    }

    /// Number of channels switched on
    pub fn active_channels(&self) -> usize {
        self.switches.iter().filter(|on| **on).count()
    }
}

impl BeatPayload for LightPayload {
    const KIND: SlotKind = SlotKind::Light;

    fn default_payload() -> Self {
        Self::default()
    }

    fn properties(&self) -> &BeatProperties {
        &self.properties
    }

    fn color_tag(&self) -> Option<char> {
        self.motion().map(|m| m.tag())
    }

    fn color(&self) -> [u8; 3] {
        self.motion()
            .map_or_else(|| Self::KIND.default_color(), |m| m.color())
    }
}

/// Motor motion payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionPayload {
    /// Shared menu indices
    pub properties: BeatProperties,
    /// Index into the velocity table for the left wheel
    pub velocity_left_idx: usize,
    /// Index into the velocity table for the right wheel
    pub velocity_right_idx: usize,
}

impl MotionPayload {
    /// Create a motion payload
    pub fn new(properties: BeatProperties, velocity_left_idx: usize, velocity_right_idx: usize) -> Self {
        Self {
            properties,
            velocity_left_idx,
            velocity_right_idx,
        }
    }

    /// Resolved motion pattern
    pub fn motion(&self) -> Option<MotorMotion> {
        MotorMotion::from_index(self.properties.motion_idx)
    }
}

impl BeatPayload for MotionPayload {
    const KIND: SlotKind = SlotKind::Motion;

    fn default_payload() -> Self {
        Self::default()
    }

    fn properties(&self) -> &BeatProperties {
        &self.properties
    }

    fn color_tag(&self) -> Option<char> {
        self.motion().map(|m| m.tag())
    }

    fn color(&self) -> [u8; 3] {
        self.motion()
            .map_or_else(|| Self::KIND.default_color(), |m| m.color())
    }
}

/// A payload of either kind, as delivered by an edit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotPayload {
    /// Targets the light timeline
    Light(LightPayload),
    /// Targets the motion timeline
    Motion(MotionPayload),
}

impl SlotPayload {
    /// Timeline kind this payload targets
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Light(_) => SlotKind::Light,
            Self::Motion(_) => SlotKind::Motion,
        }
    }

    /// Shared menu indices
    pub fn properties(&self) -> &BeatProperties {
        match self {
            Self::Light(p) => p.properties(),
            Self::Motion(p) => p.properties(),
        }
    }
}

impl From<LightPayload> for SlotPayload {
    fn from(payload: LightPayload) -> Self {
        Self::Light(payload)
    }
}

impl From<MotionPayload> for SlotPayload {
    fn from(payload: MotionPayload) -> Self {
        Self::Motion(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_tags_follow_menu_order() {
        let tags: String = MotorMotion::ALL.iter().map(MotorMotion::tag).collect();
        assert_eq!(tags, "SPTBCW");
        assert_eq!(MotorMotion::from_index(3), Some(MotorMotion::BackAndForth));
        assert_eq!(MotorMotion::from_index(6), None);
    }

    #[test]
    fn test_color_tag_from_motion_index() {
        let light = LightPayload::new(BeatProperties::new(1, 0, 0), [false; LIGHT_CHANNELS]);
        assert_eq!(light.color_tag(), Some('R'));

        let motion = MotionPayload::new(BeatProperties::new(5, 0, 0), 2, 3);
        assert_eq!(motion.color_tag(), Some('W'));

        let unknown = MotionPayload::new(BeatProperties::new(42, 0, 0), 0, 0);
        assert_eq!(unknown.color_tag(), None);
        assert_eq!(unknown.color(), SlotKind::Motion.default_color());
    }

    #[test]
    fn test_apply_payload_copies_extras() {
        let mut switches = [false; LIGHT_CHANNELS];
        switches[2] = true;
        switches[7] = true;
        let source = LightPayload::new(BeatProperties::new(2, 3, 1), switches);

        let mut target = LightPayload::default_payload();
        target.apply_payload(&source);

        assert_eq!(target, source);
        assert_eq!(target.active_channels(), 2);
    }

    #[test]
    fn test_slot_payload_kind() {
        let payload: SlotPayload = MotionPayload::default().into();
        assert_eq!(payload.kind(), SlotKind::Motion);
        assert_eq!(payload.kind().name(), "Motion");
    }
}
