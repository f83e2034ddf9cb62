//! Continuous movement over the grid.
//!
//! Entities travel along cell-center lines. Each tick an entity first takes a
//! naive step; if that step touches a new cell center, the step is rewound to
//! that center, the crossroad policy picks an exit, and whatever distance is
//! left over is spent along the new direction.

use log::error;

use super::policy::CrossroadPolicy;
use super::utils::{manhattan, offset};
use crate::board::BoardMap;
use crate::error::{EngineError, EngineResult};
use crate::types::{Direction, DirectionSet, Position};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub position: Position,
    pub direction: Direction,
    /// Cell center where a crossroad decision was made this step, if any.
    pub crossroad: Option<(i32, i32)>,
}

/// Exits out of a cell: every axis whose neighbor is not a wall, plus `None`.
pub fn open_directions(board: &BoardMap, row: i32, col: i32) -> DirectionSet {
    let mut open: DirectionSet = Direction::AXES
        .into_iter()
        .filter(|dir| {
            let (nr, nc) = offset(row, col, *dir);
            board.is_open(nr, nc)
        })
        .collect();
    open.insert(Direction::None);
    open
}

/// Moves `amount` cells along `direction`, consulting `policy` when a cell
/// center is reached.
///
/// `amount` must not exceed one cell: only the first center on the path is
/// considered.
pub fn advance<P: CrossroadPolicy + ?Sized>(
    board: &BoardMap,
    position: Position,
    direction: Direction,
    amount: f64,
    policy: &mut P,
) -> EngineResult<Step> {
    let (di, dj) = direction.vector();
    let naive = Position {
        row: position.row + amount * di as f64,
        col: position.col + amount * dj as f64,
        height: position.height,
    };

    if !touches_new_cell(&position, &naive) {
        return Ok(Step {
            position: naive,
            direction,
            crossroad: None,
        });
    }

    let (row, col) = entered_cell(&position, direction);
    let remaining = (amount - manhattan(&position, row, col)).max(0.0);
    let open = open_directions(board, row, col);
    let chosen = policy.choose(open);
    if !open.contains(chosen) {
        error!("crossroad policy chose {chosen:?} at ({row}, {col}); open {open:?}");
        return Err(EngineError::PolicyViolation { chosen, open });
    }

    let (ci, cj) = chosen.vector();
    Ok(Step {
        position: Position {
            row: row as f64 + remaining * ci as f64,
            col: col as f64 + remaining * cj as f64,
            height: position.height,
        },
        direction: chosen,
        crossroad: Some((row, col)),
    })
}

fn touches_new_cell(before: &Position, after: &Position) -> bool {
    before.floor_cell() != after.floor_cell() || before.ceil_cell() != after.ceil_cell()
}

/// First cell center reached from `position` heading along `direction`.
/// Off-axis coordinates are already whole and simply round.
fn entered_cell(position: &Position, direction: Direction) -> (i32, i32) {
    let (di, dj) = direction.vector();
    (snap(position.row, di), snap(position.col, dj))
}

fn snap(value: f64, heading: i32) -> i32 {
    let snapped = match heading.signum() {
        1 => value.ceil(),
        -1 => value.floor(),
        _ => value.round(),
    };
    snapped as i32
}
