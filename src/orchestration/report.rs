//! JSON report of a finished batch.

use serde::Serialize;

use crate::engine::SimulationResult;
use crate::orchestration::batch::{compare_runs, StrategyOutcome, StrategyRun};
use crate::orchestration::summary::{ComparisonEntry, StrategySummary};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub name: &'a str,
    pub fingerprint: &'a str,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a StrategySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a SimulationResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<'a> {
    pub strategies: Vec<RunReport<'a>>,
    pub comparison: Vec<ComparisonEntry>,
}

impl<'a> BatchReport<'a> {
    /// Build the report; snapshots and events are only included when `full`.
    pub fn new(runs: &'a [StrategyRun], full: bool) -> Self {
        let strategies = runs
            .iter()
            .map(|run| {
                let (outcome, error) = match &run.outcome {
                    StrategyOutcome::Completed { .. } => ("completed", None),
                    StrategyOutcome::Rejected { error } => ("rejected", Some(error.clone())),
                    StrategyOutcome::Failed { error } => ("failed", Some(error.clone())),
                    StrategyOutcome::TimedOut { timeout_ms } => (
                        "timed_out",
                        Some(format!("Timed out after {} ms", timeout_ms)),
                    ),
                };
                RunReport {
                    name: &run.name,
                    fingerprint: &run.fingerprint,
                    outcome,
                    summary: run.outcome.summary(),
                    error,
                    result: if full { run.outcome.result() } else { None },
                }
            })
            .collect();

        Self {
            strategies,
            comparison: compare_runs(runs),
        }
    }
}
