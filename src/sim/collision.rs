//! Pairwise collision resolution and equal-level merging
//!
//! Runs once per tick after the physics step, as a fixed number of relaxation
//! passes over all unordered ball pairs. A merge structurally changes the
//! collection, so it terminates the entire resolution for the tick; the next
//! tick rescans from scratch. Removing that early return changes the
//! convergence behavior of the relaxation loop.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::physics::apply_boundary_constraints;
use super::state::{Ball, Jar};
use crate::tuning::Tuning;

/// Outcome of an equal-level merge
#[derive(Debug, Clone, Copy)]
pub struct MergeEvent {
    /// Level of the newly created ball
    pub level: u8,
    /// Points awarded for creating it
    pub value: u32,
    /// Midpoint of the two parents, where the child was placed
    pub pos: Vec2,
}

/// Resolve overlaps among the settled balls for one tick.
///
/// Returns the merge event if one occurred; the caller applies the score.
pub fn resolve_collisions(
    balls: &mut Vec<Ball>,
    jar: &Jar,
    tuning: &Tuning,
    rng: &mut Pcg32,
) -> Option<MergeEvent> {
    for _pass in 0..tuning.relaxation_passes {
        for i in 0..balls.len() {
            // Earlier pairs may have pushed this ball out of bounds
            apply_boundary_constraints(&mut balls[i], jar, tuning);

            for j in (i + 1)..balls.len() {
                apply_boundary_constraints(&mut balls[j], jar, tuning);

                if !balls[i].intersects(&balls[j]) {
                    continue;
                }

                let level = balls[i].level;
                if level == balls[j].level && level + 1 <= tuning.max_merge_level {
                    return Some(merge_pair(balls, i, j));
                }
                // Same level at the cap falls through to a plain bounce
                separate_and_bounce(balls, i, j, jar, tuning, rng);
            }
        }
    }
    None
}

/// Replace the pair with one ball of the next level at their midpoint
fn merge_pair(balls: &mut Vec<Ball>, i: usize, j: usize) -> MergeEvent {
    let midpoint = (balls[i].pos + balls[j].pos) / 2.0;
    let level = balls[i].level + 1;

    balls.remove(j);
    balls.remove(i);

    let child = Ball::new(midpoint.x, midpoint.y, level);
    let event = MergeEvent {
        level,
        value: child.value,
        pos: midpoint,
    };
    balls.push(child);
    event
}

/// Push an overlapping pair apart and apply a restitution impulse
fn separate_and_bounce(
    balls: &mut [Ball],
    i: usize,
    j: usize,
    jar: &Jar,
    tuning: &Tuning,
    rng: &mut Pcg32,
) {
    let (head, tail) = balls.split_at_mut(j);
    let b1 = &mut head[i];
    let b2 = &mut tail[0];

    let mut delta = b1.pos - b2.pos;
    let mut distance = delta.length();
    let min_distance = b1.radius + b2.radius;
    let overlap = min_distance - distance;

    if distance == 0.0 {
        // Exact center overlap: perturb before computing the normal
        delta = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
        distance = delta.length();
        if distance == 0.0 {
            distance = 1.0;
        }
    }
    let normal = delta / distance;

    // Distribute displacement by the other ball's mass: heavier moves less
    let move_amount = overlap / (b1.mass + b2.mass);
    b1.pos += normal * move_amount * b2.mass;
    b2.pos -= normal * move_amount * b1.mass;

    // No impulse when the pair is already separating
    let approach = (b1.vel - b2.vel).dot(normal);
    if approach > 0.0 {
        return;
    }

    let impulse = -(1.0 + tuning.bounce_factor) * approach / (1.0 / b1.mass + 1.0 / b2.mass);
    b1.vel += normal * (impulse / b1.mass);
    b2.vel -= normal * (impulse / b2.mass);

    apply_boundary_constraints(b1, jar, tuning);
    apply_boundary_constraints(b2, jar, tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn setup() -> (Jar, Tuning, Pcg32) {
        let tuning = Tuning::default();
        (Jar::centered(&tuning), tuning, Pcg32::seed_from_u64(1))
    }

    #[test]
    fn test_equal_level_pair_merges_at_midpoint() {
        let (jar, tuning, mut rng) = setup();
        let mut balls = vec![Ball::new(180.0, 400.0, 2), Ball::new(220.0, 400.0, 2)];

        let event = resolve_collisions(&mut balls, &jar, &tuning, &mut rng)
            .expect("overlapping equal-level pair must merge");
        assert_eq!(event.level, 3);
        assert_eq!(event.value, 80);
        assert_eq!(balls.len(), 1);
        assert_eq!(balls[0].level, 3);
        assert_eq!(balls[0].pos, Vec2::new(200.0, 400.0));
    }

    #[test]
    fn test_cap_level_pair_bounces_without_merging() {
        let (jar, tuning, mut rng) = setup();
        // max_merge_level is 6, so two level-6 balls must not grow
        let mut balls = vec![Ball::new(190.0, 400.0, 6), Ball::new(210.0, 400.0, 6)];

        let event = resolve_collisions(&mut balls, &jar, &tuning, &mut rng);
        assert!(event.is_none());
        assert_eq!(balls.len(), 2);
        // Relaxation fully separates the pair
        let distance = balls[0].pos.distance(balls[1].pos);
        assert!(distance + 1e-3 >= balls[0].radius + balls[1].radius);
    }

    #[test]
    fn test_different_levels_separate_without_merging() {
        let (jar, tuning, mut rng) = setup();
        let mut balls = vec![Ball::new(195.0, 400.0, 1), Ball::new(215.0, 400.0, 2)];

        let event = resolve_collisions(&mut balls, &jar, &tuning, &mut rng);
        assert!(event.is_none());
        assert_eq!(balls.len(), 2);
        let distance = balls[0].pos.distance(balls[1].pos);
        assert!(distance + 1e-3 >= balls[0].radius + balls[1].radius);
    }

    #[test]
    fn test_heavier_ball_moves_less() {
        let (jar, tuning, mut rng) = setup();
        let small = Ball::new(195.0, 400.0, 0);
        let big = Ball::new(215.0, 400.0, 4);
        let small_start = small.pos;
        let big_start = big.pos;
        let mut balls = vec![small, big];

        resolve_collisions(&mut balls, &jar, &tuning, &mut rng);
        let small_moved = balls[0].pos.distance(small_start);
        let big_moved = balls[1].pos.distance(big_start);
        assert!(small_moved > big_moved);
    }

    #[test]
    fn test_separating_pair_keeps_velocities() {
        let (jar, tuning, mut rng) = setup();
        let mut b1 = Ball::new(190.0, 400.0, 6);
        let mut b2 = Ball::new(210.0, 400.0, 6);
        b1.vel = Vec2::new(-3.0, 0.0);
        b2.vel = Vec2::new(3.0, 0.0);
        let mut balls = vec![b1, b2];

        resolve_collisions(&mut balls, &jar, &tuning, &mut rng);
        assert_eq!(balls[0].vel, Vec2::new(-3.0, 0.0));
        assert_eq!(balls[1].vel, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_approaching_pair_gets_opposite_impulses() {
        let (jar, tuning, mut rng) = setup();
        let mut b1 = Ball::new(190.0, 400.0, 6);
        let mut b2 = Ball::new(210.0, 400.0, 6);
        b1.vel = Vec2::new(5.0, 0.0);
        b2.vel = Vec2::new(-5.0, 0.0);
        let mut balls = vec![b1, b2];

        resolve_collisions(&mut balls, &jar, &tuning, &mut rng);
        // Equal masses: velocities reverse, scaled by restitution
        assert!(balls[0].vel.x < 0.0);
        assert!(balls[1].vel.x > 0.0);
        assert!((balls[0].vel.x + balls[1].vel.x).abs() < 1e-3);
    }

    #[test]
    fn test_zero_distance_pair_is_perturbed_apart() {
        let (jar, tuning, mut rng) = setup();
        // Same point, cap level so the degenerate branch runs instead of a merge
        let mut balls = vec![Ball::new(200.0, 400.0, 6), Ball::new(200.0, 400.0, 6)];

        let event = resolve_collisions(&mut balls, &jar, &tuning, &mut rng);
        assert!(event.is_none());
        let distance = balls[0].pos.distance(balls[1].pos);
        assert!(distance > 0.0);
        assert!(balls[0].pos.is_finite() && balls[1].pos.is_finite());
    }

    #[test]
    fn test_merge_short_circuits_remaining_pairs() {
        let (jar, tuning, mut rng) = setup();
        // Two mergeable pairs; only the first scanned pair merges this tick
        let mut balls = vec![
            Ball::new(100.0, 400.0, 1),
            Ball::new(110.0, 400.0, 1),
            Ball::new(290.0, 400.0, 2),
            Ball::new(300.0, 400.0, 2),
        ];

        let event = resolve_collisions(&mut balls, &jar, &tuning, &mut rng).expect("merge");
        assert_eq!(event.level, 2);
        // The second pair is untouched until the next tick rescans
        assert_eq!(balls.len(), 3);
        assert!(balls.iter().filter(|b| b.level == 2).count() >= 2);
    }
}
