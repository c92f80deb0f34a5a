use std::path::Path;

use anyhow::{Context, Result, bail};
use keymaze_core::EngineConfig;
use serde::{Deserialize, Serialize};

/// Settings read from the optional TOML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Real-time length of one engine frame.
    pub frame_millis: u64,
    pub log_level: String,
    pub engine: EngineConfig,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            frame_millis: 16,
            log_level: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl TuiConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        match self.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => bail!("Invalid log level '{other}'"),
        }
        if self.frame_millis == 0 {
            bail!("frame_millis must be greater than 0");
        }
        self.engine.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = TuiConfig::from_toml(
            r#"
            frame_millis = 33

            [engine]
            enemy_step_frames = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.frame_millis, 33);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.engine.enemy_step_frames, 10);
        assert!(!config.engine.freeze_enemies_during_reset);
        assert_eq!(
            config.engine.win_reset_frames,
            EngineConfig::default().win_reset_frames
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = TuiConfig::default();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = TuiConfig::default();
        config.engine.enemy_step_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(TuiConfig::from_toml("frame_millis = \"fast\"").is_err());
    }
}
