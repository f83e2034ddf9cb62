use super::*;

/// The player always starts standing still; the spawn direction only sets
/// which way it faces.
pub(super) fn spawn_player(spawn: Spawn) -> PlayerInternal {
    PlayerInternal {
        view: PlayerView {
            position: Position::grounded(spawn.row, spawn.col),
            direction: Direction::None,
            intended_direction: Direction::None,
            vertical_velocity: 0.0,
            facing_angle: spawn.direction.facing_angle().unwrap_or(0.0),
            power_up_active_until_ms: None,
        },
        spawn,
    }
}

pub(super) fn spawn_ghost(ghost: &GhostSpawn) -> GhostInternal {
    GhostInternal {
        view: GhostView {
            id: ghost.id.clone(),
            position: Position::grounded(ghost.spawn.row, ghost.spawn.col),
            direction: ghost.spawn.direction,
            facing_angle: ghost.spawn.direction.facing_angle().unwrap_or(0.0),
        },
        spawn: ghost.spawn,
    }
}

impl<R: RngCore> GameSimulation<R> {
    /// Puts the player and every ghost back on their spawn cells in one go.
    pub(super) fn reset_entities(&mut self) {
        self.player = spawn_player(self.player.spawn);
        for ghost in &mut self.ghosts {
            let roster_entry = GhostSpawn {
                id: ghost.view.id.clone(),
                spawn: ghost.spawn,
            };
            *ghost = spawn_ghost(&roster_entry);
        }
    }
}
