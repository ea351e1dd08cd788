//! Stage settings
//!
//! Read from LocalStorage on the web so the playground can be tweaked from the
//! devtools console without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; wall-clock time when absent
    pub seed: Option<u64>,

    // === Scene ===
    /// Delay before the ceiling closes (ms)
    pub ceiling_delay_ms: u32,

    // === Interaction ===
    /// Drag spring stiffness
    pub drag_stiffness: f32,

    // === Gravity ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Periodically reverse gravity
    pub gravity_flip: bool,
    /// Time between reversals (ms)
    pub gravity_flip_interval_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            ceiling_delay_ms: CEILING_DELAY_MS,

            drag_stiffness: DRAG_STIFFNESS,

            gravity: GRAVITY,
            gravity_flip: false,
            gravity_flip_interval_ms: GRAVITY_FLIP_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "blockfall_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Gravity flip period in seconds, if flipping is on
    pub fn gravity_flip_period(&self) -> Option<f64> {
        (self.gravity_flip && self.gravity_flip_interval_ms > 0)
            .then(|| self.gravity_flip_interval_ms as f64 / 1000.0)
    }

    /// Ceiling delay in seconds
    pub fn ceiling_delay_secs(&self) -> f64 {
        self.ceiling_delay_ms as f64 / 1000.0
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Ignoring malformed settings in LocalStorage");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ceiling_delay_ms, 3000);
        assert_eq!(settings.drag_stiffness, 1.4);
        assert!(settings.gravity_flip_period().is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"seed": 7, "gravity_flip": true}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.gravity_flip_period(), Some(5.0));
        assert_eq!(settings.ceiling_delay_secs(), 3.0);
    }

    #[test]
    fn test_restitution_is_not_configurable() {
        // Stale keys from older builds are ignored, not applied
        let settings = Settings::from_json(r#"{"restitution": 0.1}"#).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(Settings::from_json("{not json").is_none());
    }
}
