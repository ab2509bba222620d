//! Per-tick simulation orchestration
//!
//! One tick, in order: dropping-ball fall, physics step over all settled
//! balls, collision/merge resolution, a final boundary settle, then the
//! out-of-play evaluation that can end the game. The host calls this once per
//! frame interval; commands apply strictly between ticks.

use super::collision::resolve_collisions;
use super::physics::{apply_boundary_constraints, integrate_ball};
use super::state::{GamePhase, GameState};
use crate::consts::DROP_SPAWN_Y;

/// Advance the simulation by one frame at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, now_ms: u64) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    let jar = state.jar;
    let tuning = state.tuning;

    // The dropping ball falls by direct position increment, not velocity
    // integration. The asymmetry with settled balls is intentional: it sets
    // the drop feel, so do not unify the two paths.
    if let Some(ball) = state.dropping.as_mut() {
        if ball.pos.y > ball.radius + DROP_SPAWN_Y {
            ball.pos.y += tuning.gravity;
            ball.pos.y += ball.vel.y;
            apply_boundary_constraints(ball, &jar, &tuning);
        }
    }

    for ball in &mut state.balls {
        integrate_ball(ball, &tuning);
        apply_boundary_constraints(ball, &jar, &tuning);
    }

    if let Some(merge) = resolve_collisions(&mut state.balls, &jar, &tuning, &mut state.rng) {
        state.score += merge.value as u64;
        log::debug!(
            "Merged into level {} at ({:.1}, {:.1}): +{} (score {})",
            merge.level,
            merge.pos.x,
            merge.pos.y,
            merge.value,
            state.score
        );
    }

    for ball in &mut state.balls {
        apply_boundary_constraints(ball, &jar, &tuning);
    }

    evaluate_out_of_play(state, now_ms);
}

/// Start, check and reset out-of-play grace timers; may end the game.
///
/// A ball is out of play when its top edge is above the jar's top line or it
/// has escaped past either wall. The first offending tick stamps the timer;
/// exceeding the grace period ends the game immediately and the remaining
/// balls are not evaluated. Returning in play clears the stamp, so separate
/// excursions never accumulate.
fn evaluate_out_of_play(state: &mut GameState, now_ms: u64) {
    let jar = state.jar;
    let grace_ms = state.tuning.out_of_bounds_grace_ms;

    for ball in &mut state.balls {
        let out_of_play = ball.pos.y - ball.radius < jar.top_line
            || ball.pos.x + ball.radius < jar.left()
            || ball.pos.x - ball.radius > jar.right();

        if !out_of_play {
            ball.out_of_play_since = None;
            continue;
        }
        match ball.out_of_play_since {
            None => ball.out_of_play_since = Some(now_ms),
            Some(since) if now_ms.saturating_sub(since) > grace_ms => {
                log::info!("Ball out of play past grace period, game over (score {})", state.score);
                state.phase = GamePhase::GameOver;
                break;
            }
            Some(_) => {}
        }
    }
}
