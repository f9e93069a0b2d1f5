//! Persisted user preferences
//!
//! The small bits of session state worth keeping between runs: the MIDI
//! channel used for auditioning and the last connected output device, so
//! `send` works without flags once a device has been picked.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// MIDI channel used for auditioning (1-16)
    pub midi_channel: u8,
    /// Name of the last connected MIDI output device
    pub last_device: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            midi_channel: 1,
            last_device: None,
        }
    }
}

/// Preferences file location: `<config_dir>/patchdeck/preferences.json`.
pub fn preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("patchdeck")
        .join("preferences.json")
}

impl Preferences {
    /// Load preferences, falling back to defaults when the file is missing
    /// or unreadable. Never fails startup.
    pub fn load() -> Self {
        Self::load_from(&preferences_path())
    }

    fn load_from(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => return Self::default(),
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed preferences file {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Save preferences, creating the config directory if needed.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&preferences_path())
    }

    fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let prefs = Preferences {
            midi_channel: 4,
            last_device: Some("MD-BT01 Bluetooth".to_string()),
        };
        prefs.save_to(&path).unwrap();

        assert_eq!(Preferences::load_from(&path), prefs);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Preferences::load_from(&dir.path().join("nope.json"));
        assert_eq!(loaded, Preferences::default());
        assert_eq!(loaded.midi_channel, 1);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Preferences::load_from(&path), Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"midi_channel": 9}"#).unwrap();

        let loaded = Preferences::load_from(&path);
        assert_eq!(loaded.midi_channel, 9);
        assert_eq!(loaded.last_device, None);
    }
}
