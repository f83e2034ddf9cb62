use std::f64::consts::TAU;

use crate::types::{Direction, Position};

pub(super) fn offset(row: i32, col: i32, dir: Direction) -> (i32, i32) {
    let (di, dj) = dir.vector();
    (row + di, col + dj)
}

pub(super) fn manhattan(position: &Position, row: i32, col: i32) -> f64 {
    (position.row - row as f64).abs() + (position.col - col as f64).abs()
}

/// Wraps into `[0, 2π)`. `rem_euclid` can round up to exactly 2π for tiny
/// negative inputs, which is folded back to zero.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
