use thiserror::Error;

use crate::types::{Direction, DirectionSet};

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the simulation and its construction helpers.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A caller supplied something that is not one of the five canonical directions.
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// A crossroad policy answered outside the open set it was given.
    /// The tick that hit this is aborted and nothing is committed.
    #[error("crossroad policy chose {chosen:?} outside open set {open:?}")]
    PolicyViolation {
        chosen: Direction,
        open: DirectionSet,
    },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config io error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl EngineError {
    /// Contract violations are programming errors; everything else is a rejected input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }
}
