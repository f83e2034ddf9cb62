use super::*;

impl<R: RngCore> GameSimulation<R> {
    /// Eats whatever sits under the player. Both the floor and the ceil cell
    /// are checked so the cell being left and the one being entered are
    /// covered while the player straddles a boundary.
    pub(super) fn apply_player_pickups(&mut self, now_ms: u64) {
        let position = self.player.view.position;
        for (row, col) in [position.floor_cell(), position.ceil_cell()] {
            match self.board.consume(row, col) {
                Some(CellKind::Pellet) => {
                    self.score = self.score.saturating_add(self.config.pellet_score);
                    self.events.push(GameEvent::PelletEaten {
                        row,
                        col,
                        total_score: self.score,
                    });
                    debug!("pellet eaten at ({row}, {col}); score {}", self.score);
                }
                Some(CellKind::PowerUp) => {
                    let active_until_ms = now_ms.saturating_add(self.config.power_up_duration_ms);
                    self.score = self.score.saturating_add(self.config.power_up_score);
                    self.player.view.power_up_active_until_ms = Some(active_until_ms);
                    self.events.push(GameEvent::PowerUpEaten {
                        row,
                        col,
                        active_until_ms,
                    });
                    info!("power-up eaten at ({row}, {col}); active until {active_until_ms}ms");
                }
                _ => {}
            }
        }

        if !self.cleared && self.board.items().next().is_none() {
            self.cleared = true;
            self.events.push(GameEvent::BoardCleared);
            info!("board cleared at tick {}; score {}", self.tick_counter, self.score);
        }
    }

    /// Sphere test between the player and each ghost. Any hit resets every
    /// entity to its spawn state within this tick.
    pub(super) fn resolve_ghost_collisions(&mut self) {
        let reach = self.config.player_hitbox_radius + self.config.ghost_hitbox_radius;
        let player_position = self.player.view.position;
        let Some(ghost_id) = self
            .ghosts
            .iter()
            .find(|ghost| ghost.view.position.distance(&player_position) <= reach)
            .map(|ghost| ghost.view.id.clone())
        else {
            return;
        };

        info!(
            "player caught by {ghost_id} at ({:.2}, {:.2}); resetting entities",
            player_position.row, player_position.col
        );
        self.events.push(GameEvent::PlayerCaught { ghost_id });
        self.reset_entities();
    }
}
