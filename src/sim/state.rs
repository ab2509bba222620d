//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here, plus the
//! command surface the presentation layer drives (`set_pointer_x`,
//! `commit_drop`, `restart`) and the snapshot accessors it renders from.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{DROP_SPAWN_Y, JAR_TOP_BUFFER, LEVEL_COUNT, PANEL_HEIGHT, PANEL_WIDTH};
use crate::platform::Clock;
use crate::tuning::Tuning;

/// Per-level (radius, merge value) lookup, level 0 (smallest) through 7
const LEVEL_TABLE: [(f32, u32); LEVEL_COUNT] = [
    (15.0, 10),
    (22.5, 20),
    (30.0, 40),
    (37.5, 80),
    (46.0, 160),
    (53.5, 320),
    (60.0, 320),
    (67.5, 320),
];

/// Radius for a ball level
///
/// Panics on an out-of-range level: spawn and merge logic bound levels, so a
/// bad level here is a programming error.
#[inline]
pub fn level_radius(level: u8) -> f32 {
    assert!((level as usize) < LEVEL_COUNT, "ball level {level} out of range");
    LEVEL_TABLE[level as usize].0
}

/// Points awarded when a ball of this level is created via merge
#[inline]
pub fn level_value(level: u8) -> u32 {
    assert!((level as usize) < LEVEL_COUNT, "ball level {level} out of range");
    LEVEL_TABLE[level as usize].1
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Size tier, 0 (smallest) through 7
    pub level: u8,
    pub radius: f32,
    /// mass = radius²; heavier balls are harder to push
    pub mass: f32,
    /// Points awarded when this ball is created via merge
    pub value: u32,
    /// Wall-clock ms when this ball first left the play area; `None` while in play
    pub out_of_play_since: Option<u64>,
}

impl Ball {
    /// Create a ball at (x, y) with properties derived from `level`
    pub fn new(x: f32, y: f32, level: u8) -> Self {
        let radius = level_radius(level);
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            level,
            radius,
            mass: radius * radius,
            value: level_value(level),
            out_of_play_since: None,
        }
    }

    /// True iff the circles overlap (center distance strictly below radius sum)
    pub fn intersects(&self, other: &Ball) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }
}

/// Immutable play-area geometry
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Jar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// A resting ball whose top edge is above this line is out of play
    pub top_line: f32,
}

impl Jar {
    /// Jar centered horizontally in the panel, bottom flush with the panel bottom
    pub fn centered(tuning: &Tuning) -> Self {
        let x = (PANEL_WIDTH - tuning.jar_width) / 2.0;
        let y = PANEL_HEIGHT - tuning.jar_height;
        Self {
            x,
            y,
            width: tuning.jar_width,
            height: tuning.jar_height,
            top_line: y + JAR_TOP_BUFFER,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Current phase of gameplay
///
/// Committing a drop spawns the next controlled ball in the same command, so
/// outside of game over there is always a dropping ball to steer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// A controlled ball exists; pointer and drop commands are live
    Dropping,
    /// Run ended; simulation frozen until restart
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG for spawn levels and degenerate-collision perturbation
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub jar: Jar,
    /// Settled balls (order-irrelevant; removed on merge, appended on drop)
    pub balls: Vec<Ball>,
    /// The player-controlled ball, at most one
    pub dropping: Option<Ball>,
    pub score: u64,
    pub phase: GamePhase,
    /// Time source for the grace timer; not part of serialized state
    #[serde(skip)]
    pub clock: Clock,
}

impl GameState {
    /// Create a fresh game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    /// Create a fresh game with explicit tuning
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let jar = Jar::centered(&tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            jar,
            balls: Vec::new(),
            dropping: None,
            score: 0,
            phase: GamePhase::Dropping,
            clock: Clock::monotonic(),
        };
        state.spawn_dropping_ball();
        state
    }

    /// Replace the time source (tests, scripted drivers)
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Spawn the next controlled ball above the jar at a random level
    fn spawn_dropping_ball(&mut self) {
        let level = self.rng.random_range(0..=self.tuning.max_initial_level);
        self.dropping = Some(Ball::new(PANEL_WIDTH / 2.0, DROP_SPAWN_Y, level));
    }

    /// Advance the simulation by one frame interval using the attached clock
    pub fn tick(&mut self) {
        let now_ms = self.clock.now_ms();
        self.tick_at(now_ms);
    }

    /// Advance one frame at an explicit wall-clock time
    pub fn tick_at(&mut self, now_ms: u64) {
        super::tick::tick(self, now_ms);
    }

    // --- Commands (wrong-state calls are no-ops, never errors) ---

    /// Reposition the dropping ball horizontally, clamped to the jar interior
    pub fn set_pointer_x(&mut self, x: f32) {
        if self.phase != GamePhase::Dropping {
            return;
        }
        if let Some(ball) = self.dropping.as_mut() {
            let clamped = x.clamp(self.jar.left() + ball.radius, self.jar.right() - ball.radius);
            ball.pos.x = clamped;
        }
    }

    /// Commit the controlled ball into the jar and ready the next one
    pub fn commit_drop(&mut self) {
        if self.phase != GamePhase::Dropping {
            return;
        }
        if let Some(mut ball) = self.dropping.take() {
            // Start the fall from the spawn height regardless of visual drift
            ball.pos.y = DROP_SPAWN_Y;
            self.balls.push(ball);
            self.spawn_dropping_ball();
        }
    }

    /// Reset to the initial state; only valid after game over
    pub fn restart(&mut self) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        log::info!("Restarting (final score {})", self.score);
        self.balls.clear();
        self.score = 0;
        self.phase = GamePhase::Dropping;
        self.spawn_dropping_ball();
    }

    // --- Snapshots for the presentation layer ---

    /// Settled balls, for rendering
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// The controlled ball, if the game is running
    pub fn dropping_ball(&self) -> Option<&Ball> {
        self.dropping.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table_exact() {
        let expected = [
            (15.0, 10),
            (22.5, 20),
            (30.0, 40),
            (37.5, 80),
            (46.0, 160),
            (53.5, 320),
            (60.0, 320),
            (67.5, 320),
        ];
        for (level, (radius, value)) in expected.iter().enumerate() {
            assert_eq!(level_radius(level as u8), *radius);
            assert_eq!(level_value(level as u8), *value);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_level_panics() {
        let _ = level_radius(8);
    }

    #[test]
    fn test_mass_is_radius_squared() {
        for level in 0..8u8 {
            let ball = Ball::new(0.0, 0.0, level);
            assert_eq!(ball.mass, ball.radius * ball.radius);
        }
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = Ball::new(0.0, 0.0, 0);
        // Exactly touching (distance == radius sum) is not an overlap
        let touching = Ball::new(30.0, 0.0, 0);
        assert!(!a.intersects(&touching));
        let overlapping = Ball::new(29.0, 0.0, 0);
        assert!(a.intersects(&overlapping));
    }

    #[test]
    fn test_jar_centered_geometry() {
        let jar = Jar::centered(&Tuning::default());
        assert_eq!(jar.x, 50.0);
        assert_eq!(jar.y, 100.0);
        assert_eq!(jar.right(), 350.0);
        assert_eq!(jar.bottom(), 600.0);
        assert_eq!(jar.top_line, 120.0);
    }

    #[test]
    fn test_new_game_spawns_dropping_ball() {
        let state = GameState::new(7);
        let ball = state.dropping_ball().expect("dropping ball");
        assert!(ball.level <= state.tuning.max_initial_level);
        assert_eq!(ball.pos.y, DROP_SPAWN_Y);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_set_pointer_x_clamps_to_jar_interior() {
        let mut state = GameState::new(42);
        state.set_pointer_x(200.0);
        let r = state.dropping_ball().unwrap().radius;

        state.set_pointer_x(50.0);
        assert_eq!(state.dropping_ball().unwrap().pos.x, state.jar.left() + r);

        state.set_pointer_x(10_000.0);
        assert_eq!(state.dropping_ball().unwrap().pos.x, state.jar.right() - r);
    }

    #[test]
    fn test_commit_drop_settles_and_respawns() {
        let mut state = GameState::new(1);
        let level = state.dropping_ball().unwrap().level;
        state.commit_drop();
        assert_eq!(state.balls().len(), 1);
        assert_eq!(state.balls()[0].level, level);
        assert_eq!(state.balls()[0].pos.y, DROP_SPAWN_Y);
        // A fresh controlled ball is ready immediately
        assert!(state.dropping_ball().is_some());
    }

    #[test]
    fn test_restart_is_noop_while_running() {
        let mut state = GameState::new(1);
        state.commit_drop();
        state.restart();
        assert_eq!(state.balls().len(), 1);
    }
}
