//! Strategy batch runner: parallel runs, timeouts, summaries and comparison.

pub mod batch;
pub mod fingerprint;
pub mod report;
pub mod summary;

pub use batch::{
    compare_runs, NamedStrategy, StrategyBatch, StrategyOutcome, StrategyRun,
    DEFAULT_STRATEGY_TIMEOUT,
};
pub use fingerprint::run_fingerprint;
pub use report::{BatchReport, RunReport};
pub use summary::{compare_by_net_worth, ComparisonEntry, StrategySummary};
