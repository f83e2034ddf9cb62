use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    pub const AXES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const ALL: [Direction; 5] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::None,
    ];

    /// `(di, dj)`: row delta then column delta.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Option<Self> {
        match self {
            Self::Up => Some(Self::Down),
            Self::Down => Some(Self::Up),
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::None => None,
        }
    }

    /// Visual heading in `[0, 2π)`. `None` has no heading.
    pub fn facing_angle(self) -> Option<f64> {
        match self {
            Self::Right => Some(0.0),
            Self::Up => Some(FRAC_PI_2),
            Self::Left => Some(PI),
            Self::Down => Some(3.0 * FRAC_PI_2),
            Self::None => None,
        }
    }

    pub fn is_stationary(self) -> bool {
        self == Self::None
    }

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Up => 1,
            Self::Down => 1 << 1,
            Self::Left => 1 << 2,
            Self::Right => 1 << 3,
            Self::None => 1 << 4,
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = EngineError;

    fn try_from(vector: (i32, i32)) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.vector() == vector)
            .ok_or_else(|| EngineError::InvalidDirection(format!("{vector:?}")))
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::parse_move(&normalized).ok_or_else(|| EngineError::InvalidDirection(s.to_string()))
    }
}

/// Small set of directions, used for the open exits of a cell.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn remove(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|dir| self.contains(*dir))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::empty();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl fmt::Debug for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Empty,
    Wall,
    Pellet,
    PowerUp,
}

impl CellKind {
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' => Some(Self::Empty),
            '#' => Some(Self::Wall),
            '.' => Some(Self::Pellet),
            'o' => Some(Self::PowerUp),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Pellet => '.',
            Self::PowerUp => 'o',
        }
    }

    pub fn is_consumable(self) -> bool {
        matches!(self, Self::Pellet | Self::PowerUp)
    }
}

/// Continuous grid position. Integer `(row, col)` is a cell center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    pub row: f64,
    pub col: f64,
    pub height: f64,
}

impl Position {
    pub fn grounded(row: i32, col: i32) -> Self {
        Self {
            row: row as f64,
            col: col as f64,
            height: 0.0,
        }
    }

    pub fn floor_cell(&self) -> (i32, i32) {
        (self.row.floor() as i32, self.col.floor() as i32)
    }

    pub fn ceil_cell(&self) -> (i32, i32) {
        (self.row.ceil() as i32, self.col.ceil() as i32)
    }

    /// Straight-line distance with height on the same scale as the grid.
    pub fn distance(&self, other: &Position) -> f64 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        let dh = self.height - other.height;
        (dr * dr + dc * dc + dh * dh).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub position: Position,
    pub direction: Direction,
    #[serde(rename = "intendedDirection")]
    pub intended_direction: Direction,
    #[serde(rename = "verticalVelocity")]
    pub vertical_velocity: f64,
    #[serde(rename = "facingAngle")]
    pub facing_angle: f64,
    #[serde(rename = "powerUpActiveUntilMs")]
    pub power_up_active_until_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GhostView {
    pub id: String,
    pub position: Position,
    pub direction: Direction,
    #[serde(rename = "facingAngle")]
    pub facing_angle: f64,
}

/// Wall cell with the walls around it, for building wall meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BarrierView {
    pub row: i32,
    pub col: i32,
    #[serde(rename = "hasBarrierAbove")]
    pub above: bool,
    #[serde(rename = "hasBarrierBelow")]
    pub below: bool,
    #[serde(rename = "hasBarrierLeft")]
    pub left: bool,
    #[serde(rename = "hasBarrierRight")]
    pub right: bool,
    #[serde(rename = "hasBarrierAboveLeft")]
    pub above_left: bool,
    #[serde(rename = "hasBarrierAboveRight")]
    pub above_right: bool,
    #[serde(rename = "hasBarrierBelowLeft")]
    pub below_left: bool,
    #[serde(rename = "hasBarrierBelowRight")]
    pub below_right: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PelletView {
    pub kind: CellKind,
    pub row: i32,
    pub col: i32,
    pub world: WorldPoint,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PelletEaten {
        row: i32,
        col: i32,
        #[serde(rename = "totalScore")]
        total_score: u32,
    },
    PowerUpEaten {
        row: i32,
        col: i32,
        #[serde(rename = "activeUntilMs")]
        active_until_ms: u64,
    },
    PlayerCaught {
        #[serde(rename = "ghostId")]
        ghost_id: String,
    },
    BoardCleared,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "nowMs")]
    pub now_ms: u64,
    pub state: RunState,
    pub score: u32,
    #[serde(rename = "poweredUp")]
    pub powered_up: bool,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    #[serde(rename = "pelletsLeft")]
    pub pellets_left: usize,
    #[serde(rename = "powerUpsLeft")]
    pub power_ups_left: usize,
    pub events: Vec<GameEvent>,
}
