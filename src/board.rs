use crate::constants::{Spawn, DEFAULT_MAZE, GHOST_ROSTER, PLAYER_SPAWN};
use crate::error::{EngineError, EngineResult};
use crate::types::{BarrierView, CellKind, Position, WorldPoint};

/// Row-major grid of cell kinds with a solid wall border.
///
/// Reads outside the grid return [`CellKind::Wall`], so movement code never
/// needs its own bounds checks. Consumption is the only mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardMap {
    rows: i32,
    cols: i32,
    cells: Vec<CellKind>,
}

impl BoardMap {
    pub fn from_tiles<S: AsRef<str>>(tiles: &[S]) -> EngineResult<Self> {
        if tiles.is_empty() {
            return Err(EngineError::InvalidBoard("layout has no rows".to_string()));
        }
        let cols = tiles[0].as_ref().chars().count();
        if cols == 0 {
            return Err(EngineError::InvalidBoard("layout has no columns".to_string()));
        }

        let mut cells = Vec::with_capacity(tiles.len() * cols);
        for (row, line) in tiles.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != cols {
                return Err(EngineError::InvalidBoard(format!(
                    "row {row} has {} cells, expected {cols}",
                    line.chars().count()
                )));
            }
            for (col, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph).ok_or_else(|| {
                    EngineError::InvalidBoard(format!("unknown glyph {glyph:?} at ({row}, {col})"))
                })?;
                cells.push(kind);
            }
        }

        let board = Self {
            rows: tiles.len() as i32,
            cols: cols as i32,
            cells,
        };
        board.check_border()?;
        Ok(board)
    }

    fn check_border(&self) -> EngineResult<()> {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let on_border =
                    row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1;
                if on_border && self.cell_at(row, col) != CellKind::Wall {
                    return Err(EngineError::InvalidBoard(format!(
                        "border cell ({row}, {col}) is not a wall"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows && col >= 0 && col < self.cols
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        self.in_bounds(row, col)
            .then(|| (row * self.cols + col) as usize)
    }

    pub fn cell_at(&self, row: i32, col: i32) -> CellKind {
        match self.index(row, col) {
            Some(idx) => self.cells[idx],
            None => CellKind::Wall,
        }
    }

    pub fn is_open(&self, row: i32, col: i32) -> bool {
        self.cell_at(row, col) != CellKind::Wall
    }

    /// Empties a pellet or power-up cell and reports what was there.
    /// Any other cell is left alone and yields `None`.
    pub fn consume(&mut self, row: i32, col: i32) -> Option<CellKind> {
        let idx = self.index(row, col)?;
        let kind = self.cells[idx];
        if !kind.is_consumable() {
            return None;
        }
        self.cells[idx] = CellKind::Empty;
        Some(kind)
    }

    /// Every wall with its eight neighbors. Cells outside the grid count as
    /// open here; the virtual border only exists for movement.
    pub fn barriers(&self) -> Vec<BarrierView> {
        let is_wall = |row: i32, col: i32| {
            self.index(row, col)
                .map(|idx| self.cells[idx] == CellKind::Wall)
                .unwrap_or(false)
        };
        let mut barriers = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if !is_wall(row, col) {
                    continue;
                }
                barriers.push(BarrierView {
                    row,
                    col,
                    above: is_wall(row - 1, col),
                    below: is_wall(row + 1, col),
                    left: is_wall(row, col - 1),
                    right: is_wall(row, col + 1),
                    above_left: is_wall(row - 1, col - 1),
                    above_right: is_wall(row - 1, col + 1),
                    below_left: is_wall(row + 1, col - 1),
                    below_right: is_wall(row + 1, col + 1),
                });
            }
        }
        barriers
    }

    /// Remaining pellets and power-ups, row-major.
    pub fn items(&self) -> impl Iterator<Item = (i32, i32, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| kind.is_consumable())
            .map(|(idx, kind)| {
                let idx = idx as i32;
                (idx / self.cols, idx % self.cols, *kind)
            })
    }

    pub fn remaining(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    pub fn to_world(&self, position: &Position) -> WorldPoint {
        WorldPoint {
            x: position.col,
            y: position.row,
            z: position.height,
        }
    }

    pub fn center(&self) -> WorldPoint {
        WorldPoint {
            x: (self.cols - 1) as f64 / 2.0,
            y: (self.rows - 1) as f64 / 2.0,
            z: 0.0,
        }
    }

    pub fn tiles(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|kind| kind.glyph()).collect())
            .collect()
    }
}

impl Default for BoardMap {
    fn default() -> Self {
        Self::from_tiles(&DEFAULT_MAZE).expect("built-in maze is well formed")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GhostSpawn {
    pub id: String,
    pub spawn: Spawn,
}

/// A board together with the fixed spawn roster played on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub board: BoardMap,
    pub player_spawn: Spawn,
    pub ghost_spawns: Vec<GhostSpawn>,
}

impl Level {
    pub fn new(
        board: BoardMap,
        player_spawn: Spawn,
        ghost_spawns: Vec<GhostSpawn>,
    ) -> EngineResult<Self> {
        let spawns = std::iter::once(("player", &player_spawn))
            .chain(ghost_spawns.iter().map(|ghost| (ghost.id.as_str(), &ghost.spawn)));
        for (who, spawn) in spawns {
            if !board.is_open(spawn.row, spawn.col) {
                return Err(EngineError::InvalidBoard(format!(
                    "{who} spawns inside a wall at ({}, {})",
                    spawn.row, spawn.col
                )));
            }
        }
        Ok(Self {
            board,
            player_spawn,
            ghost_spawns,
        })
    }
}

impl Default for Level {
    fn default() -> Self {
        Self {
            board: BoardMap::default(),
            player_spawn: PLAYER_SPAWN,
            ghost_spawns: GHOST_ROSTER
                .iter()
                .map(|(id, spawn)| GhostSpawn {
                    id: id.to_string(),
                    spawn: *spawn,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn small_board() -> BoardMap {
        BoardMap::from_tiles(&["#####", "#.o #", "#####"]).expect("valid board")
    }

    #[test]
    fn out_of_range_reads_are_walls() {
        let board = small_board();
        assert_eq!(board.cell_at(-1, 0), CellKind::Wall);
        assert_eq!(board.cell_at(0, -7), CellKind::Wall);
        assert_eq!(board.cell_at(3, 1), CellKind::Wall);
        assert_eq!(board.cell_at(1, 5), CellKind::Wall);
        assert_eq!(board.cell_at(1, 1), CellKind::Pellet);
        assert_eq!(board.cell_at(1, 2), CellKind::PowerUp);
        assert_eq!(board.cell_at(1, 3), CellKind::Empty);
    }

    #[test]
    fn consume_empties_once() {
        let mut board = small_board();
        assert_eq!(board.consume(1, 1), Some(CellKind::Pellet));
        assert_eq!(board.consume(1, 1), None);
        assert_eq!(board.cell_at(1, 1), CellKind::Empty);
        assert_eq!(board.consume(1, 2), Some(CellKind::PowerUp));
        assert_eq!(board.consume(1, 3), None);
        assert_eq!(board.consume(0, 0), None);
        assert_eq!(board.cell_at(0, 0), CellKind::Wall);
        assert_eq!(board.consume(-4, 9), None);
    }

    #[test]
    fn rejects_malformed_layouts() {
        let empty: [&str; 0] = [];
        assert!(BoardMap::from_tiles(&empty).is_err());
        assert!(BoardMap::from_tiles(&["###", "#.##", "###"]).is_err());
        assert!(BoardMap::from_tiles(&["###", "#x#", "###"]).is_err());
        assert!(BoardMap::from_tiles(&["###", "..#", "###"]).is_err());
    }

    #[test]
    fn barriers_report_eight_neighbors_without_virtual_border() {
        let board = small_board();
        let barriers = board.barriers();
        assert_eq!(barriers.len(), 12);

        let corner = barriers
            .iter()
            .find(|b| b.row == 0 && b.col == 0)
            .expect("top-left corner is a wall");
        assert!(!corner.above);
        assert!(!corner.left);
        assert!(!corner.above_left);
        assert!(corner.right);
        assert!(corner.below);
        assert!(!corner.below_right);

        let top_middle = barriers
            .iter()
            .find(|b| b.row == 0 && b.col == 2)
            .expect("top edge is a wall");
        assert!(top_middle.left && top_middle.right);
        assert!(!top_middle.below);
        assert!(!top_middle.below_left);
    }

    #[test]
    fn barriers_do_not_mutate_the_board() {
        let board = small_board();
        let before = board.clone();
        let _ = board.barriers();
        assert_eq!(board, before);
    }

    #[test]
    fn items_and_counts_track_consumption() {
        let mut board = small_board();
        let items: Vec<_> = board.items().collect();
        assert_eq!(
            items,
            vec![(1, 1, CellKind::Pellet), (1, 2, CellKind::PowerUp)]
        );
        board.consume(1, 1);
        assert_eq!(board.remaining(CellKind::Pellet), 0);
        assert_eq!(board.remaining(CellKind::PowerUp), 1);
    }

    #[test]
    fn world_conversion_and_center() {
        let board = small_board();
        let point = board.to_world(&Position {
            row: 1.0,
            col: 2.5,
            height: 0.25,
        });
        assert_eq!(point, WorldPoint { x: 2.5, y: 1.0, z: 0.25 });
        assert_eq!(board.center(), WorldPoint { x: 2.0, y: 1.0, z: 0.0 });
        assert_eq!(board.tiles(), vec!["#####", "#.o #", "#####"]);
    }

    #[test]
    fn default_maze_matches_the_classic_layout() {
        let board = BoardMap::default();
        assert_eq!(board.rows(), 10);
        assert_eq!(board.cols(), 28);
        assert_eq!(board.remaining(CellKind::Pellet), 94);
        let power_ups: Vec<(i32, i32)> = board
            .items()
            .filter(|(_, _, kind)| *kind == CellKind::PowerUp)
            .map(|(row, col, _)| (row, col))
            .collect();
        assert_eq!(power_ups, vec![(1, 26), (3, 1), (7, 1), (7, 26)]);
    }

    #[test]
    fn level_rejects_spawn_inside_wall() {
        let result = Level::new(
            small_board(),
            Spawn {
                row: 0,
                col: 0,
                direction: Direction::None,
            },
            Vec::new(),
        );
        assert!(matches!(result, Err(EngineError::InvalidBoard(_))));
        assert!(Level::new(
            BoardMap::default(),
            PLAYER_SPAWN,
            Level::default().ghost_spawns
        )
        .is_ok());
    }
}
