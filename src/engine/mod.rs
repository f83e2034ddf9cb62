use std::f64::consts::TAU;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::board::{BoardMap, GhostSpawn, Level};
use crate::config::EngineConfig;
use crate::constants::{Spawn, PELLET_BOB_PHASE_PER_CELL};
use crate::error::EngineResult;
pub use crate::types::RunState;
use crate::types::{
    BarrierView, CellKind, Direction, GameEvent, GhostView, PelletView, PlayerView, Position,
    Snapshot, WorldPoint,
};

mod collision;
mod movement;
mod physics;
mod policy;
mod spawn_system;
mod utils;

pub use self::movement::{advance, open_directions, Step};
pub use self::physics::{anneal_angle, integrate_vertical};
pub use self::policy::{immediate_turn, CrossroadPolicy, GhostPolicy, PlayerPolicy};
pub use self::utils::normalize_angle;

use self::spawn_system::{spawn_ghost, spawn_player};

#[derive(Clone, Debug)]
struct PlayerInternal {
    view: PlayerView,
    spawn: Spawn,
}

#[derive(Clone, Debug)]
struct GhostInternal {
    view: GhostView,
    spawn: Spawn,
}

/// Tick-driven simulation of one maze. The host owns the clock and calls
/// [`GameSimulation::tick`] at `config().tick_rate`.
#[derive(Clone, Debug)]
pub struct GameSimulation<R = StdRng> {
    config: EngineConfig,

    board: BoardMap,
    rng: R,
    player: PlayerInternal,
    ghosts: Vec<GhostInternal>,
    events: Vec<GameEvent>,

    state: RunState,
    tick_counter: u64,
    score: u32,
    cleared: bool,
}

impl GameSimulation<StdRng> {
    /// Default level, ghosts driven by an OS-seeded generator.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_rng(config, Level::default(), StdRng::from_os_rng())
    }

    pub fn seeded(config: EngineConfig, seed: u64) -> EngineResult<Self> {
        Self::with_rng(config, Level::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> GameSimulation<R> {
    pub fn with_rng(config: EngineConfig, level: Level, rng: R) -> EngineResult<Self> {
        config.validate()?;
        let Level {
            board,
            player_spawn,
            ghost_spawns,
        } = level;
        let cleared = board.items().next().is_none();
        let ghosts = ghost_spawns.iter().map(spawn_ghost).collect::<Vec<_>>();
        debug!(
            "simulation ready: {}x{} board, {} ghosts, {} ticks/s",
            board.rows(),
            board.cols(),
            ghosts.len(),
            config.tick_rate
        );

        Ok(Self {
            config,
            board,
            rng,
            player: spawn_player(player_spawn),
            ghosts,
            events: Vec::new(),
            state: RunState::Idle,
            tick_counter: 0,
            score: 0,
            cleared,
        })
    }

    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        self.state = RunState::Running;
        info!("simulation started at tick {}", self.tick_counter);
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Idle {
            return;
        }
        self.state = RunState::Idle;
        info!("simulation paused at tick {}", self.tick_counter);
    }

    /// Records the player's wish. Reversals and starts from standstill take
    /// effect immediately; other turns wait for the next crossroad.
    pub fn change_intended_direction(&mut self, intended: Direction) {
        let player = &mut self.player.view;
        player.intended_direction = intended;
        if let Some(turn) = immediate_turn(player.direction, intended) {
            player.direction = turn;
        }
    }

    /// Launches a jump if the player is on the floor. The impulse is consumed
    /// by the next tick's integration.
    pub fn request_jump(&mut self) -> bool {
        let player = &mut self.player.view;
        if player.position.height != 0.0 {
            return false;
        }
        player.vertical_velocity = self.config.jump_impulse;
        true
    }

    /// Advances the world by one tick. Does nothing while idle.
    ///
    /// A crossroad policy that answers outside the open set aborts the tick
    /// with [`crate::EngineError::PolicyViolation`]; no entity state from that
    /// tick is committed.
    pub fn tick(&mut self) -> EngineResult<()> {
        if self.state == RunState::Idle {
            return Ok(());
        }

        let dt = self.config.tick_seconds();
        let rate = self.config.facing_anneal_rate;

        let mut player = self.player.view.clone();
        let mut player_policy = PlayerPolicy::new(player.intended_direction, player.direction);
        let step = advance(
            &self.board,
            player.position,
            player.direction,
            self.config.player_step(),
            &mut player_policy,
        )?;
        if let Some((row, col)) = step.crossroad {
            trace!("player crossroad at ({row}, {col}) -> {:?}", step.direction);
        }
        player.position = step.position;
        player.direction = step.direction;
        player.facing_angle = face_toward(player.facing_angle, player.direction, rate);
        let (height, velocity) = integrate_vertical(
            player.position.height,
            player.vertical_velocity,
            self.config.gravity,
            dt,
        );
        player.position.height = height;
        player.vertical_velocity = velocity;

        let ghost_step = self.config.ghost_step();
        let mut ghosts = Vec::with_capacity(self.ghosts.len());
        for ghost in &self.ghosts {
            let mut view = ghost.view.clone();
            let mut policy = GhostPolicy::new(view.direction, &mut self.rng);
            let step = advance(
                &self.board,
                view.position,
                view.direction,
                ghost_step,
                &mut policy,
            )?;
            view.position = step.position;
            view.direction = step.direction;
            view.facing_angle = face_toward(view.facing_angle, view.direction, rate);
            ghosts.push(view);
        }

        self.player.view = player;
        for (ghost, view) in self.ghosts.iter_mut().zip(ghosts) {
            ghost.view = view;
        }
        self.tick_counter += 1;

        let now_ms = self.now_ms();
        self.apply_player_pickups(now_ms);
        self.resolve_ghost_collisions();
        Ok(())
    }

    /// Validated at construction and fixed for the simulation's lifetime.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Simulation clock derived from the tick count.
    pub fn now_ms(&self) -> u64 {
        self.tick_counter.saturating_mul(1_000) / u64::from(self.config.tick_rate)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_powered_up(&self) -> bool {
        self.player
            .view
            .power_up_active_until_ms
            .is_some_and(|until| self.now_ms() < until)
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn player(&self) -> &PlayerView {
        &self.player.view
    }

    pub fn ghosts(&self) -> Vec<GhostView> {
        self.ghosts.iter().map(|ghost| ghost.view.clone()).collect()
    }

    pub fn board(&self) -> &BoardMap {
        &self.board
    }

    pub fn barriers(&self) -> Vec<BarrierView> {
        self.board.barriers()
    }

    /// Remaining pellets and power-ups in world space, bobbing over
    /// `animation_time_s`. Neighboring cells are phase shifted.
    pub fn pellets(&self, animation_time_s: f64) -> Vec<PelletView> {
        let period = self.config.pellet_bob_period_s;
        let amplitude = self.config.pellet_bob_amplitude;
        self.board
            .items()
            .map(|(row, col, kind)| {
                let phase = TAU * animation_time_s / period
                    + f64::from(row + col) * PELLET_BOB_PHASE_PER_CELL;
                let base = self.board.to_world(&Position::grounded(row, col));
                PelletView {
                    kind,
                    row,
                    col,
                    world: WorldPoint {
                        z: amplitude * phase.sin(),
                        ..base
                    },
                }
            })
            .collect()
    }

    pub fn board_center(&self) -> WorldPoint {
        self.board.center()
    }

    /// Events recorded since the last draining snapshot.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn snapshot(&mut self, drain_events: bool) -> Snapshot {
        Snapshot {
            tick: self.tick_counter,
            now_ms: self.now_ms(),
            state: self.state,
            score: self.score,
            powered_up: self.is_powered_up(),
            player: self.player.view.clone(),
            ghosts: self.ghosts(),
            pellets_left: self.board.remaining(CellKind::Pellet),
            power_ups_left: self.board.remaining(CellKind::PowerUp),
            events: if drain_events {
                std::mem::take(&mut self.events)
            } else {
                self.events.clone()
            },
        }
    }
}

fn face_toward(current: f64, direction: Direction, rate: f64) -> f64 {
    match direction.facing_angle() {
        Some(target) => anneal_angle(current, target, rate),
        None => current,
    }
}
