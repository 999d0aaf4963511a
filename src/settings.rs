//! Run configuration
//!
//! Injected into the simulation instead of read from ambient globals.
//! Loaded from JSON with per-field defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, SCAVENGE_SECONDS};

/// Play-field bounds in pixels (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// Run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play-field bounds
    pub viewport: Viewport,
    /// Frame deltas above this are clamped (tab-switch stalls)
    pub max_frame_dt: f32,
    /// Length of the scavenge countdown
    pub scavenge_seconds: f32,
    /// RNG seed; `None` lets the front end pick one
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            max_frame_dt: MAX_FRAME_DT,
            scavenge_seconds: SCAVENGE_SECONDS,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Using default settings ({}: {})", path.display(), err);
                Self::default()
            }
        }
    }

    /// Clamp values that would stall or invert the simulation
    fn sanitize(&mut self) {
        self.viewport = Viewport::new(self.viewport.width, self.viewport.height);
        if self.max_frame_dt.is_nan() || self.max_frame_dt <= 0.0 {
            self.max_frame_dt = MAX_FRAME_DT;
        }
        self.scavenge_seconds = self.scavenge_seconds.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.viewport, Viewport::default());
        assert_eq!(settings.max_frame_dt, MAX_FRAME_DT);
    }

    #[test]
    fn test_sanitize_rejects_nonpositive_dt() {
        let settings = Settings::from_json(r#"{ "max_frame_dt": 0.0, "scavenge_seconds": -3 }"#)
            .unwrap();
        assert_eq!(settings.max_frame_dt, MAX_FRAME_DT);
        assert_eq!(settings.scavenge_seconds, 0.0);
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            viewport: Viewport::new(1024.0, 768.0),
            seed: Some(42),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.viewport, settings.viewport);
        assert_eq!(back.seed, Some(42));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ nope").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(settings.scavenge_seconds, SCAVENGE_SECONDS);
    }
}
