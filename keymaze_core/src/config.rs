use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than 0")]
    ZeroCadence { field: &'static str },
}

/// Fixed timing constants of the engine, all measured in frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frames between two enemy patrol steps.
    pub enemy_step_frames: u32,
    /// Frames a death stays on screen before the level resets.
    pub death_reset_frames: u32,
    /// Frames a win stays on screen before the level resets.
    pub win_reset_frames: u32,
    /// Ignore move requests while a reset is pending.
    pub lock_input_during_reset: bool,
    /// Hold enemies in place while a reset is pending.
    pub freeze_enemies_during_reset: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enemy_step_frames: 20,
            death_reset_frames: 30,
            win_reset_frames: 90,
            lock_input_during_reset: true,
            freeze_enemies_during_reset: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cadences = [
            ("enemy_step_frames", self.enemy_step_frames),
            ("death_reset_frames", self.death_reset_frames),
            ("win_reset_frames", self.win_reset_frames),
        ];
        match cadences.into_iter().find(|&(_, frames)| frames == 0) {
            Some((field, _)) => Err(ConfigError::ZeroCadence { field }),
            None => Ok(()),
        }
    }
}
