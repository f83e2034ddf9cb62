pub mod board;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod types;

pub use board::{BoardMap, GhostSpawn, Level};
pub use config::EngineConfig;
pub use engine::{GameSimulation, RunState};
pub use error::{EngineError, EngineResult};
pub use types::{CellKind, Direction, GameEvent, Position, Snapshot};
