//! Game settings and preferences
//!
//! Persisted as a JSON blob, separately from the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};
use crate::sim::ControlScheme;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// How input drives the paddle
    pub control_scheme: ControlScheme,
    /// Gamepad stick dead zone (0.0 - 1.0)
    pub gamepad_dead_zone: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all audio
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_scheme: ControlScheme::Absolute,
            gamepad_dead_zone: 0.15,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "breakout_settings";

    /// Clamp out-of-range values from hand-edited storage
    pub fn sanitized(mut self) -> Self {
        self.gamepad_dead_zone = self.gamepad_dead_zone.clamp(0.0, 0.95);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Settings>(storage, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, storage: &mut dyn Storage) {
        match save_json(storage, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_when_missing() {
        let storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            control_scheme: ControlScheme::Incremental,
            muted: true,
            ..Default::default()
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"master_volume": 3.0}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.control_scheme, ControlScheme::Absolute);
    }

    #[test]
    fn test_garbage_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
