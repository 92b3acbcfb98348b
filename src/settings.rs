//! User settings and preferences
//!
//! Persisted as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{WALL_COLUMNS, WALL_ROWS};
use crate::sim::WallLayout;

/// Largest wall a user can ask for
pub const MAX_WALL_DIMENSION: u32 = 24;

/// Demo settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Camera ===
    /// Orbit radians per dragged pixel
    pub orbit_sensitivity: f32,
    /// Distance units per wheel notch
    pub zoom_speed: f32,

    // === Wall ===
    pub wall_rows: u32,
    pub wall_columns: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            zoom_speed: 1.0,
            wall_rows: WALL_ROWS,
            wall_columns: WALL_COLUMNS,
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brickfall_settings";

    /// Clamp values loaded from storage into usable ranges
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.orbit_sensitivity.is_finite() || self.orbit_sensitivity <= 0.0 {
            self.orbit_sensitivity = defaults.orbit_sensitivity;
        }
        if !self.zoom_speed.is_finite() || self.zoom_speed <= 0.0 {
            self.zoom_speed = defaults.zoom_speed;
        }
        self.wall_rows = self.wall_rows.clamp(1, MAX_WALL_DIMENSION);
        self.wall_columns = self.wall_columns.clamp(1, MAX_WALL_DIMENSION);
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            defaults.master_volume
        };
        self
    }

    /// Effective output volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Wall layout for these settings
    pub fn wall_layout(&self) -> WallLayout {
        WallLayout::with_size(self.wall_rows, self.wall_columns)
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring corrupt settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"muted": true}"#);
        assert!(settings.muted);
        assert_eq!(settings.wall_rows, WALL_ROWS);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = Settings::from_json(
            r#"{"wall_rows": 0, "wall_columns": 500, "master_volume": 3.0, "orbit_sensitivity": -1.0}"#,
        );
        assert_eq!(settings.wall_rows, 1);
        assert_eq!(settings.wall_columns, MAX_WALL_DIMENSION);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.orbit_sensitivity, Settings::default().orbit_sensitivity);
    }

    #[test]
    fn test_wall_layout_from_settings() {
        let settings = Settings {
            wall_rows: 3,
            wall_columns: 7,
            ..Default::default()
        };
        let layout = settings.wall_layout();
        assert_eq!((layout.rows, layout.columns), (3, 7));
    }
}
