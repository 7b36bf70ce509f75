use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub scenario_path: PathBuf,
    pub strategy_timeout: Duration,
    pub output_mode: OutputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Summaries and the comparison table only.
    Summary,
    /// Summaries plus every snapshot and event.
    Full,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let scenario_path = env_map
            .get("SCENARIO_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingEnv("SCENARIO_PATH".to_string()))?;

        let timeout_ms = env_map
            .get("STRATEGY_TIMEOUT_MS")
            .map(|s| s.as_str())
            .unwrap_or("5000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "STRATEGY_TIMEOUT_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "STRATEGY_TIMEOUT_MS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        let output_mode = match env_map
            .get("OUTPUT_MODE")
            .map(|s| s.as_str())
            .unwrap_or("summary")
        {
            "summary" => OutputMode::Summary,
            "full" => OutputMode::Full,
            other => {
                return Err(ConfigError::InvalidValue(
                    "OUTPUT_MODE".to_string(),
                    format!("must be summary or full, got {}", other),
                ))
            }
        };

        Ok(Config {
            scenario_path,
            strategy_timeout: Duration::from_millis(timeout_ms),
            output_mode,
        })
    }
}
