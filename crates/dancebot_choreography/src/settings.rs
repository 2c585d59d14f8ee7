// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings stored as RON.
//!
//! The value tables map the menu indices carried by payloads to the numbers
//! the robot uses. The registry never reads them; they only resolve edit
//! requests before they reach the coordinator.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings file format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "dancebot.ron";

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for the settings
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// File was written by a newer editor
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Menu value tables and editor preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographySettings {
    /// File format version
    pub version: u32,
    /// Sequence lengths offered, in beats
    pub length_choices: Vec<usize>,
    /// Wheel velocities offered for motion payloads
    pub velocity_choices: Vec<i32>,
    /// Light pattern frequencies, in beats per cycle
    pub light_frequencies: Vec<f32>,
    /// Motion pattern frequencies, in beats per cycle
    pub motion_frequencies: Vec<f32>,
}

impl Default for ChoreographySettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            length_choices: vec![1, 2, 4, 8, 16, 32],
            velocity_choices: (0..=10).map(|v| v * 10).collect(),
            light_frequencies: vec![0.25, 0.5, 1.0, 2.0, 4.0],
            motion_frequencies: vec![0.25, 0.5, 1.0, 2.0, 4.0],
        }
    }
}

impl ChoreographySettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: ChoreographySettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Sequence length for a length menu index
    pub fn length_at(&self, idx: usize) -> Option<usize> {
        self.length_choices.get(idx).copied()
    }

    /// Wheel velocity for a velocity menu index
    pub fn velocity_at(&self, idx: usize) -> Option<i32> {
        self.velocity_choices.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let mut settings = ChoreographySettings::default();
        settings.length_choices = vec![1, 3, 5];
        settings.save(&path).unwrap();

        let loaded = ChoreographySettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.length_at(2), Some(5));
        assert_eq!(loaded.length_at(3), None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ChoreographySettings::load_or_default(&dir.path().join("missing.ron")).unwrap();
        assert_eq!(settings, ChoreographySettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(length_choices: [2, 4])").unwrap();

        let settings = ChoreographySettings::load(&path).unwrap();
        assert_eq!(settings.length_choices, vec![2, 4]);
        assert_eq!(settings.velocity_at(10), Some(100));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(length_choices: [").unwrap();

        assert!(matches!(
            ChoreographySettings::load_or_default(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(version: 99)").unwrap();

        assert!(matches!(
            ChoreographySettings::load(&path),
            Err(SettingsError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
