//! Game settings and preferences
//!
//! Persisted as JSON next to the high score, under its own key.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// All sound off
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Neon glow around ball and paddle
    pub glow: bool,
    /// Background grid
    pub grid: bool,

    // === Accessibility ===
    /// Reduced motion (drops the glow halo)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 1.0,
            sfx_volume: 1.0,
            glow: true,
            grid: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon_bounce_settings";

    /// Effective glow (respects reduced_motion)
    pub fn effective_glow(&self) -> bool {
        self.glow && !self.reduced_motion
    }

    /// Volume multiplier applied to every cue
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Load settings, using defaults for anything missing or malformed
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not load settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::Write {
            key: Self::STORAGE_KEY.to_string(),
            reason: e.to_string(),
        })?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
