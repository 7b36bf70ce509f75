//! JSON scenario files: one investment plus the named strategies to run on it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::InvestmentDefinition;
use crate::orchestration::NamedStrategy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub investment: InvestmentDefinition,
    pub strategies: Vec<NamedStrategy>,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Scenario defines no strategies")]
    NoStrategies,
    #[error("Duplicate strategy name: {0}")]
    DuplicateName(String),
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.check()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Structural checks only; strategy semantics are validated per run.
    fn check(&self) -> Result<(), ScenarioError> {
        if self.strategies.is_empty() {
            return Err(ScenarioError::NoStrategies);
        }
        let mut seen = HashSet::new();
        for named in &self.strategies {
            if !seen.insert(named.name.as_str()) {
                return Err(ScenarioError::DuplicateName(named.name.clone()));
            }
        }
        Ok(())
    }
}
