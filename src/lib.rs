pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod scenario;

pub use config::{Config, OutputMode};
pub use domain::{
    CapitalInjectionRule, ConfigurationError, Decimal, EndReason, Event, FinancingKind,
    InjectionFrequency, InvestmentDefinition, Period, PortfolioSnapshot, PropertyId,
    RefinanceFrequency, RefinancePolicy, StrategyConfig, StrategyKind, TrackingFrequency,
};
pub use engine::{
    simulate, simulate_with_cancel, CancelFlag, SimulationError, SimulationResult,
    SimulationState,
};
pub use error::AppError;
pub use orchestration::{BatchReport, NamedStrategy, StrategyBatch, StrategyOutcome, StrategyRun};
pub use scenario::{Scenario, ScenarioError};
