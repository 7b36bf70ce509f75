//! Runs several named strategies against one investment in parallel.
//!
//! Each simulation runs on Tokio's blocking pool under its own timeout. A run
//! that times out has its cancel flag raised so the worker stops at the next
//! period boundary; nothing from it is reported.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::domain::{InvestmentDefinition, StrategyConfig};
use crate::engine::{simulate_with_cancel, CancelFlag, SimulationResult};
use crate::orchestration::fingerprint::run_fingerprint;
use crate::orchestration::summary::{compare_by_net_worth, ComparisonEntry, StrategySummary};

pub const DEFAULT_STRATEGY_TIMEOUT: Duration = Duration::from_millis(5000);

/// A strategy with the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedStrategy {
    pub name: String,
    pub strategy: StrategyConfig,
}

impl NamedStrategy {
    pub fn new(name: impl Into<String>, strategy: StrategyConfig) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StrategyOutcome {
    Completed {
        summary: StrategySummary,
        result: SimulationResult,
    },
    /// Rejected before or during the run (invalid configuration or financing).
    Rejected { error: String },
    /// The worker task panicked or was aborted.
    Failed { error: String },
    TimedOut { timeout_ms: u64 },
}

impl StrategyOutcome {
    pub fn summary(&self) -> Option<&StrategySummary> {
        match self {
            StrategyOutcome::Completed { summary, .. } => Some(summary),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        match self {
            StrategyOutcome::Completed { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Outcome of one named strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyRun {
    pub name: String,
    pub fingerprint: String,
    #[serde(flatten)]
    pub outcome: StrategyOutcome,
}

#[derive(Debug, Clone)]
pub struct StrategyBatch {
    investment: Arc<InvestmentDefinition>,
    timeout: Duration,
}

impl StrategyBatch {
    pub fn new(investment: InvestmentDefinition) -> Self {
        Self {
            investment: Arc::new(investment),
            timeout: DEFAULT_STRATEGY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every strategy concurrently. Results keep the input order.
    pub async fn run(&self, strategies: Vec<NamedStrategy>) -> Vec<StrategyRun> {
        let runs = strategies.into_iter().map(|named| self.run_one(named));
        join_all(runs).await
    }

    async fn run_one(&self, named: NamedStrategy) -> StrategyRun {
        let NamedStrategy { name, strategy } = named;

        let fingerprint = match run_fingerprint(&self.investment, &strategy) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                return StrategyRun {
                    name,
                    fingerprint: String::new(),
                    outcome: StrategyOutcome::Failed {
                        error: format!("Failed to fingerprint strategy: {}", e),
                    },
                }
            }
        };

        let cancel = CancelFlag::new();
        let worker_cancel = cancel.clone();
        let investment = Arc::clone(&self.investment);
        let handle = tokio::task::spawn_blocking(move || {
            simulate_with_cancel(&investment, &strategy, &worker_cancel)
        });

        let outcome = match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(Ok(result))) => StrategyOutcome::Completed {
                summary: StrategySummary::from_result(&result),
                result,
            },
            Ok(Ok(Err(e))) => {
                tracing::warn!(strategy = %name, error = %e, "Strategy rejected");
                StrategyOutcome::Rejected {
                    error: e.to_string(),
                }
            }
            Ok(Err(e)) => {
                tracing::error!(strategy = %name, error = %e, "Simulation task failed");
                StrategyOutcome::Failed {
                    error: format!("Simulation task failed: {}", e),
                }
            }
            Err(_) => {
                cancel.cancel();
                tracing::warn!(
                    strategy = %name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Strategy timed out"
                );
                StrategyOutcome::TimedOut {
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            }
        };

        StrategyRun {
            name,
            fingerprint,
            outcome,
        }
    }
}

/// Comparison table over the completed runs of a batch.
pub fn compare_runs(runs: &[StrategyRun]) -> Vec<ComparisonEntry> {
    compare_by_net_worth(
        runs.iter()
            .filter_map(|run| run.outcome.summary().map(|s| (run.name.as_str(), s))),
    )
}
