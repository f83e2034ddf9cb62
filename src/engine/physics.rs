use std::f64::consts::{PI, TAU};

use super::utils::normalize_angle;

/// One trapezoidal step of the jump arc. Landing clamps height to the floor
/// and kills the velocity.
pub fn integrate_vertical(height: f64, velocity: f64, gravity: f64, dt: f64) -> (f64, f64) {
    let next_velocity = velocity + gravity * dt;
    let next_height = height + (velocity + next_velocity) / 2.0 * dt;
    if next_height <= 0.0 {
        (0.0, 0.0)
    } else {
        (next_height, next_velocity)
    }
}

/// Exponential smoothing of a heading toward `target` along the short way
/// round. Whichever angle trails by more than half a turn is lifted by a full
/// turn before blending.
pub fn anneal_angle(current: f64, target: f64, rate: f64) -> f64 {
    let mut current = normalize_angle(current);
    let mut target = normalize_angle(target);
    if target - current > PI {
        current += TAU;
    } else if current - target > PI {
        target += TAU;
    }
    normalize_angle(rate * target + (1.0 - rate) * current)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::Direction;

    /// Signed shortest rotation from `a` to `b`.
    fn arc(a: f64, b: f64) -> f64 {
        let diff = (b - a).rem_euclid(TAU);
        if diff > PI {
            diff - TAU
        } else {
            diff
        }
    }

    #[test]
    fn grounded_player_stays_grounded() {
        assert_eq!(integrate_vertical(0.0, 0.0, -12.0, 1.0 / 60.0), (0.0, 0.0));
    }

    #[test]
    fn jump_arc_returns_to_the_floor() {
        let dt = 1.0 / 60.0;
        let (mut height, mut velocity) = (0.0, 6.0);
        let mut peak: f64 = 0.0;
        let mut airborne_ticks = 0;
        for _ in 0..120 {
            (height, velocity) = integrate_vertical(height, velocity, -12.0, dt);
            peak = peak.max(height);
            if height > 0.0 {
                airborne_ticks += 1;
            }
        }
        assert_eq!(height, 0.0);
        assert_eq!(velocity, 0.0);
        assert!((peak - 1.5).abs() < 1e-6, "peak was {peak}");
        assert!((58..=61).contains(&airborne_ticks));
    }

    #[test]
    fn anneal_blends_toward_target() {
        let next = anneal_angle(0.0, PI / 2.0, 0.5);
        assert!((next - PI / 4.0).abs() < 1e-12);
        assert_eq!(anneal_angle(1.0, 1.0, 0.3), 1.0);
        assert!((anneal_angle(0.2, 2.0, 1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn anneal_wraps_the_short_way_round() {
        let down = Direction::Down.facing_angle().expect("down has a heading");
        let next = anneal_angle(0.1, down, 0.5);
        let expected = normalize_angle((0.1 + TAU + down) / 2.0);
        assert!((next - expected).abs() < 1e-12);
        assert!(next > PI);

        let back = anneal_angle(down, 0.1, 0.5);
        assert!((back - expected).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_anneal_stays_in_range_and_follows_the_short_arc(
            current in 0.0f64..TAU,
            target_idx in 0usize..4,
            rate in 0.01f64..=1.0,
        ) {
            let target = Direction::AXES[target_idx]
                .facing_angle()
                .expect("axes have headings");
            let next = anneal_angle(current, target, rate);
            prop_assert!((0.0..TAU).contains(&next));

            let wanted = arc(current, target);
            let moved = arc(current, next);
            prop_assert!(moved.abs() <= PI + 1e-9);
            prop_assert!((moved - rate * wanted).abs() < 1e-6,
                "moved {} expected {}", moved, rate * wanted);
        }
    }
}
