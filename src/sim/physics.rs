//! Per-ball motion integration and jar boundary constraints

use super::state::{Ball, Jar};
use crate::tuning::Tuning;

/// Integrate one settled ball for one tick: gravity, friction, then position
pub fn integrate_ball(ball: &mut Ball, tuning: &Tuning) {
    ball.vel.y += tuning.gravity;
    ball.vel.x *= tuning.friction;
    ball.vel.y *= tuning.friction;
    ball.pos += ball.vel;
}

/// Clamp a ball against the jar's inner walls and floor, damping velocity.
///
/// There is deliberately no top clamp: balls rise above the jar opening
/// freely, which is how the out-of-play condition is detected. Idempotent:
/// the comparisons are strict, so a clamped edge resting exactly on a wall
/// does not retrigger on the next application.
pub fn apply_boundary_constraints(ball: &mut Ball, jar: &Jar, tuning: &Tuning) {
    // Left wall
    if ball.pos.x - ball.radius < jar.left() {
        ball.pos.x = jar.left() + ball.radius;
        ball.vel.x *= -tuning.bounce_factor;
    }
    // Right wall
    if ball.pos.x + ball.radius > jar.right() {
        ball.pos.x = jar.right() - ball.radius;
        ball.vel.x *= -tuning.bounce_factor;
    }
    // Floor: restitution plus extra horizontal damping on landing
    if ball.pos.y + ball.radius > jar.bottom() {
        ball.pos.y = jar.bottom() - ball.radius;
        ball.vel.y *= -tuning.bounce_factor;
        ball.vel.x *= tuning.floor_friction;
    }
}
