//! Headless demo driver
//!
//! Runs a scripted game against the simulation core at a fixed frame
//! interval on a manual clock: sweeps the pointer, commits a drop every
//! second, and reports the score. Useful for smoke-testing tuning changes
//! without a renderer attached (`RUST_LOG=debug` shows individual merges).

use jarball::consts::FRAME_INTERVAL_MS;
use jarball::platform::Clock;
use jarball::sim::GameState;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xBA11);
    let frames: u64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3600);

    log::info!("jarball demo: seed {seed}, {frames} frames");

    let mut state = GameState::new(seed);
    state.set_clock(Clock::manual(0));

    for frame in 0..frames {
        if state.is_game_over() {
            log::info!("Game over at frame {frame}, restarting");
            state.restart();
        }

        // Sweep the pointer across the jar and drop once a second
        let sweep = (frame % 120) as f32 / 120.0;
        state.set_pointer_x(state.jar.left() + sweep * state.jar.width);
        if frame % 60 == 30 {
            state.commit_drop();
        }

        state.tick();
        state.clock.advance(FRAME_INTERVAL_MS);

        if frame % 600 == 599 {
            log::info!(
                "frame {frame}: {} balls, score {}",
                state.balls().len(),
                state.score()
            );
        }
    }

    println!(
        "Final: score {} with {} balls in the jar ({})",
        state.score(),
        state.balls().len(),
        if state.is_game_over() { "game over" } else { "still going" }
    );
}
