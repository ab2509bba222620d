//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one `tick` per frame interval)
//! - Seeded RNG only
//! - Commands apply strictly between ticks, never mid-resolution
//! - No rendering or platform dependencies in the tick path

pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{MergeEvent, resolve_collisions};
pub use physics::{apply_boundary_constraints, integrate_ball};
pub use state::{Ball, GamePhase, GameState, Jar, level_radius, level_value};
pub use tick::tick;
