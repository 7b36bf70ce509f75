use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::SimulationError;
use crate::scenario::ScenarioError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Scenario error: {0}")]
    Scenario(String),
    #[error("Simulation error: {0}")]
    Simulation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<ScenarioError> for AppError {
    fn from(err: ScenarioError) -> Self {
        AppError::Scenario(err.to_string())
    }
}

impl From<SimulationError> for AppError {
    fn from(err: SimulationError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Process exit code for the runner binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Scenario(_) => 3,
            AppError::Simulation(_) => 4,
            AppError::Internal(_) => 1,
        }
    }
}
