use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    FACING_ANNEAL_RATE, GHOST_BASE_SPEED, GHOST_HITBOX_RADIUS, GRAVITY, JUMP_IMPULSE,
    PELLET_BOB_AMPLITUDE, PELLET_BOB_PERIOD_S, PELLET_SCORE, PLAYER_BASE_SPEED,
    PLAYER_HITBOX_RADIUS, POWER_UP_DURATION_MS, POWER_UP_SCORE, TICK_RATE,
};
use crate::error::{EngineError, EngineResult};

/// Construction-time tuning. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub tick_rate: u32,
    /// Cells per second.
    pub player_speed: f64,
    /// Cells per second.
    pub ghost_speed: f64,
    pub player_hitbox_radius: f64,
    pub ghost_hitbox_radius: f64,
    /// Cells per second squared; must be negative.
    pub gravity: f64,
    pub jump_impulse: f64,
    pub facing_anneal_rate: f64,
    pub power_up_duration_ms: u64,
    pub pellet_score: u32,
    pub power_up_score: u32,
    pub pellet_bob_period_s: f64,
    pub pellet_bob_amplitude: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            player_speed: PLAYER_BASE_SPEED,
            ghost_speed: GHOST_BASE_SPEED,
            player_hitbox_radius: PLAYER_HITBOX_RADIUS,
            ghost_hitbox_radius: GHOST_HITBOX_RADIUS,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            facing_anneal_rate: FACING_ANNEAL_RATE,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            pellet_score: PELLET_SCORE,
            power_up_score: POWER_UP_SCORE,
            pellet_bob_period_s: PELLET_BOB_PERIOD_S,
            pellet_bob_amplitude: PELLET_BOB_AMPLITUDE,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Distance in cells the player covers per tick.
    pub fn player_step(&self) -> f64 {
        self.player_speed / self.tick_rate as f64
    }

    pub fn ghost_step(&self) -> f64 {
        self.ghost_speed / self.tick_rate as f64
    }

    /// Movement resolution snaps at most one cell center per tick, so a step
    /// longer than one cell is rejected here.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tick_rate == 0 {
            return Err(invalid("tickRate must be positive"));
        }
        let finite = [
            ("playerSpeed", self.player_speed),
            ("ghostSpeed", self.ghost_speed),
            ("playerHitboxRadius", self.player_hitbox_radius),
            ("ghostHitboxRadius", self.ghost_hitbox_radius),
            ("gravity", self.gravity),
            ("jumpImpulse", self.jump_impulse),
            ("facingAnnealRate", self.facing_anneal_rate),
            ("pelletBobPeriodS", self.pellet_bob_period_s),
            ("pelletBobAmplitude", self.pellet_bob_amplitude),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(&format!("{name} must be finite")));
        }
        for (name, speed) in [
            ("playerSpeed", self.player_speed),
            ("ghostSpeed", self.ghost_speed),
        ] {
            if speed < 0.0 {
                return Err(invalid(&format!("{name} must not be negative")));
            }
            if speed / self.tick_rate as f64 > 1.0 {
                return Err(invalid(&format!(
                    "{name} {speed} exceeds one cell per tick at {} ticks/s",
                    self.tick_rate
                )));
            }
        }
        if self.player_hitbox_radius < 0.0 || self.ghost_hitbox_radius < 0.0 {
            return Err(invalid("hitbox radii must not be negative"));
        }
        if self.gravity >= 0.0 {
            return Err(invalid("gravity must be negative"));
        }
        if self.jump_impulse <= 0.0 {
            return Err(invalid("jumpImpulse must be positive"));
        }
        if self.facing_anneal_rate <= 0.0 || self.facing_anneal_rate > 1.0 {
            return Err(invalid("facingAnnealRate must be in (0, 1]"));
        }
        if self.pellet_bob_period_s <= 0.0 {
            return Err(invalid("pelletBobPeriodS must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> EngineError {
    EngineError::InvalidConfig(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.player_step() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = EngineConfig::from_json_str(r#"{"tickRate": 30, "ghostSpeed": 1.5}"#)
            .expect("partial config parses");
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.ghost_speed, 1.5);
        assert_eq!(config.player_speed, PLAYER_BASE_SPEED);
        assert_eq!(config.power_up_duration_ms, POWER_UP_DURATION_MS);
    }

    #[test]
    fn step_of_exactly_one_cell_is_allowed() {
        let config = EngineConfig {
            tick_rate: 10,
            player_speed: 10.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.player_step(), 1.0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            EngineConfig {
                tick_rate: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                player_speed: 61.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                ghost_speed: -1.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                gravity: 1.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                jump_impulse: 0.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                facing_anneal_rate: 1.5,
                ..EngineConfig::default()
            },
            EngineConfig {
                pellet_bob_period_s: 0.0,
                ..EngineConfig::default()
            },
            EngineConfig {
                player_hitbox_radius: f64::NAN,
                ..EngineConfig::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(EngineError::InvalidConfig(_))),
                "expected rejection for {config:?}"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = EngineConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(EngineError::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("maze-chase-engine-missing-config.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            EngineConfig::load(&path),
            Err(EngineError::ConfigIo(_))
        ));
    }
}
