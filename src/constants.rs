use crate::types::Direction;

pub const TICK_RATE: u32 = 60;

pub const PLAYER_BASE_SPEED: f64 = 3.0;
pub const GHOST_BASE_SPEED: f64 = 2.0;
pub const PLAYER_HITBOX_RADIUS: f64 = 0.35;
pub const GHOST_HITBOX_RADIUS: f64 = 0.35;

pub const GRAVITY: f64 = -12.0;
pub const JUMP_IMPULSE: f64 = 6.0;
pub const FACING_ANNEAL_RATE: f64 = 0.25;

pub const POWER_UP_DURATION_MS: u64 = 8_000;
pub const PELLET_SCORE: u32 = 10;
pub const POWER_UP_SCORE: u32 = 50;

pub const PELLET_BOB_PERIOD_S: f64 = 2.0;
pub const PELLET_BOB_AMPLITUDE: f64 = 0.15;
pub const PELLET_BOB_PHASE_PER_CELL: f64 = 0.5;

/// `#` wall, `.` pellet, `o` power-up, space empty.
pub const DEFAULT_MAZE: [&str; 10] = [
    "############################",
    "#............##...........o#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#o.....##....##....##.....o#",
    "######.#####.##.#####.######",
    "############################",
];

/// Where an entity appears at game start and after every reset. Ghosts set
/// off along `direction`; the player only faces it and starts stationary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub row: i32,
    pub col: i32,
    pub direction: Direction,
}

pub const PLAYER_SPAWN: Spawn = Spawn {
    row: 1,
    col: 1,
    direction: Direction::None,
};

pub const GHOST_ROSTER: [(&str, Spawn); 4] = [
    (
        "blinky",
        Spawn {
            row: 5,
            col: 12,
            direction: Direction::Left,
        },
    ),
    (
        "pinky",
        Spawn {
            row: 5,
            col: 13,
            direction: Direction::Right,
        },
    ),
    (
        "inky",
        Spawn {
            row: 5,
            col: 14,
            direction: Direction::Left,
        },
    ),
    (
        "clyde",
        Spawn {
            row: 5,
            col: 15,
            direction: Direction::Right,
        },
    ),
];
