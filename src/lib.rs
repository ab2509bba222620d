//! Jarball - physics core for a jar-drop merge-ball arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, merging, game state)
//! - `tuning`: Data-driven game balance
//! - `platform`: Host clock abstraction for the out-of-play grace timer
//!
//! Rendering, input polling and UI live in the host: it forwards commands
//! (`set_pointer_x`, `commit_drop`, `restart`), calls `tick()` once per frame
//! interval, and reads back ball snapshots and the score for drawing.

pub mod platform;
pub mod sim;
pub mod tuning;

pub use platform::Clock;
pub use sim::{Ball, GamePhase, GameState, Jar};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Host frame interval (~60 Hz tick driver)
    pub const FRAME_INTERVAL_MS: u64 = 16;

    /// Panel the jar is centered in
    pub const PANEL_WIDTH: f32 = 400.0;
    pub const PANEL_HEIGHT: f32 = 600.0;

    /// Default jar dimensions (bottom flush with the panel bottom)
    pub const JAR_WIDTH: f32 = 300.0;
    pub const JAR_HEIGHT: f32 = 500.0;

    /// Buffer below the jar rim; a ball resting above this line is out of play
    pub const JAR_TOP_BUFFER: f32 = 20.0;

    /// Spawn height of the controlled dropping ball
    pub const DROP_SPAWN_Y: f32 = 50.0;

    /// Number of ball levels (0..=7)
    pub const LEVEL_COUNT: usize = 8;
}
