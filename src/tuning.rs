//! Data-driven game balance
//!
//! Every physics and lifecycle constant the simulation uses lives here so
//! hosts can retune the feel without touching the sim. Defaults give the
//! intended arcade feel: fast falling, gradual horizontal damping, no
//! vertical damping beyond bounce loss.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{JAR_HEIGHT, JAR_WIDTH};

/// Tunable simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Jar interior width in pixels
    pub jar_width: f32,
    /// Jar interior height in pixels
    pub jar_height: f32,
    /// Downward acceleration per tick (px/tick²)
    pub gravity: f32,
    /// Per-tick velocity damping factor (< 1)
    pub friction: f32,
    /// Restitution coefficient for walls, floor and ball-ball impulses (< 1)
    pub bounce_factor: f32,
    /// Extra horizontal damping applied on floor contact
    pub floor_friction: f32,
    /// Highest level a randomly spawned dropping ball may have
    pub max_initial_level: u8,
    /// Merging two balls of this level is refused (no growth past the cap)
    pub max_merge_level: u8,
    /// Wall-clock ms a ball may stay out of play before the game ends
    pub out_of_bounds_grace_ms: u64,
    /// Host frame interval in ms (~60 Hz)
    pub frame_interval_ms: u64,
    /// Relaxation passes per tick in the collision resolver
    pub relaxation_passes: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            jar_width: JAR_WIDTH,
            jar_height: JAR_HEIGHT,
            gravity: 5.0,
            friction: 0.95,
            bounce_factor: 0.7,
            floor_friction: 0.9,
            max_initial_level: 3,
            max_merge_level: 6,
            out_of_bounds_grace_ms: 4000,
            frame_interval_ms: 16,
            relaxation_passes: 5,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
