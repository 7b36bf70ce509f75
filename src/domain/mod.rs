//! Domain types for portfolio simulation.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Period, PropertyId, FinancingKind
//! - Investment, strategy and capital injection definitions with validation
//! - Emitted snapshots and ledger events

pub mod decimal;
pub mod event;
pub mod injection;
pub mod investment;
pub mod primitives;
pub mod snapshot;
pub mod strategy;
pub mod validation;

pub use decimal::Decimal;
pub use event::{Event, InjectionEvent, PurchaseEvent, RefinanceEvent};
pub use injection::{resolve_all, CapitalInjectionRule, InjectionFrequency};
pub use investment::{
    AcquisitionCosts, FinancingTerms, InvestmentDefinition, OperatingBreakdown, OperatingTerms,
    PurchaseQuote,
};
pub use primitives::{FinancingKind, Period, PropertyId};
pub use snapshot::{EndReason, PortfolioSnapshot, PortfolioYields, PropertyDetail, PropertyYields};
pub use strategy::{
    RefinanceFrequency, RefinancePolicy, StrategyConfig, StrategyKind, TrackingFrequency,
};
pub use validation::{validate, ConfigurationError};
