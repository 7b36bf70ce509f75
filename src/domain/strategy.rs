//! Strategy configuration: acquisition kind, reinvestment, refinancing, injections.

use crate::domain::{CapitalInjectionRule, Decimal, FinancingKind, Period};
use serde::{Deserialize, Serialize};

/// Which financing each new property uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Every property is bought for cash.
    CashOnly,
    /// Every property is bought with a bond.
    Leveraged,
    /// Properties alternate between kinds to approach the target split.
    Mixed {
        leveraged_ratio: Decimal,
        cash_ratio: Decimal,
        first_property_kind: FinancingKind,
    },
}

impl StrategyKind {
    /// True when any property under this strategy may carry a bond.
    pub fn uses_leverage(&self) -> bool {
        !matches!(self, StrategyKind::CashOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::CashOnly => "cash_only",
            StrategyKind::Leveraged => "leveraged",
            StrategyKind::Mixed { .. } => "mixed",
        }
    }
}

/// How often refinancing is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinanceFrequency {
    Quarterly,
    SemiAnnually,
    Annually,
    Biennially,
    /// Every N months.
    EveryMonths(u32),
}

impl RefinanceFrequency {
    pub fn interval_months(&self) -> u32 {
        match self {
            RefinanceFrequency::Quarterly => 3,
            RefinanceFrequency::SemiAnnually => 6,
            RefinanceFrequency::Annually => 12,
            RefinanceFrequency::Biennially => 24,
            RefinanceFrequency::EveryMonths(months) => *months,
        }
    }
}

/// Periodic cash-out refinancing of leveraged properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinancePolicy {
    pub frequency: RefinanceFrequency,
    /// LTV the new loan is sized to against the appreciated value.
    pub target_ltv: Decimal,
    /// Extractions at or below this amount are skipped.
    #[serde(default)]
    pub min_cash_out: Decimal,
}

impl RefinancePolicy {
    pub fn new(frequency: RefinanceFrequency, target_ltv: Decimal) -> Self {
        Self {
            frequency,
            target_ltv,
            min_cash_out: Decimal::zero(),
        }
    }

    pub fn with_min_cash_out(mut self, min_cash_out: Decimal) -> Self {
        self.min_cash_out = min_cash_out;
        self
    }

    /// True when refinancing is evaluated in `period`.
    pub fn is_due(&self, period: Period) -> bool {
        period.is_multiple_of(self.frequency.interval_months())
    }
}

/// Snapshot sampling of the (always monthly) simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingFrequency {
    #[default]
    Monthly,
    Yearly,
}

impl TrackingFrequency {
    /// Whether `period` is sampled in a run of `horizon` months.
    pub fn is_tracked(&self, period: Period, horizon: u32) -> bool {
        match self {
            TrackingFrequency::Monthly => true,
            TrackingFrequency::Yearly => {
                period.as_u32() == 1 || period.as_u32() == horizon || period.is_multiple_of(12)
            }
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cash_reserve_months() -> u32 {
    6
}

/// Full parameter set for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    /// Investor's capital available in period 1.
    pub initial_capital: Decimal,
    pub horizon_months: u32,
    #[serde(default = "default_true")]
    pub reinvest_cashflow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinancing: Option<RefinancePolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub injections: Vec<CapitalInjectionRule>,
    #[serde(default)]
    pub tracking: TrackingFrequency,
    /// Buying stops for the period once the portfolio burns cash and what is
    /// left covers fewer than this many months of it. Zero disables the stop.
    #[serde(default = "default_cash_reserve_months")]
    pub cash_reserve_months: u32,
}

impl StrategyConfig {
    fn base(kind: StrategyKind, initial_capital: Decimal, horizon_months: u32) -> Self {
        Self {
            kind,
            initial_capital,
            horizon_months,
            reinvest_cashflow: true,
            refinancing: None,
            injections: Vec::new(),
            tracking: TrackingFrequency::Monthly,
            cash_reserve_months: default_cash_reserve_months(),
        }
    }

    /// Cash-only strategy with reinvestment and no refinancing.
    pub fn cash_only(initial_capital: Decimal, horizon_months: u32) -> Self {
        Self::base(StrategyKind::CashOnly, initial_capital, horizon_months)
    }

    /// Fully leveraged strategy with reinvestment.
    pub fn leveraged(initial_capital: Decimal, horizon_months: u32) -> Self {
        Self::base(StrategyKind::Leveraged, initial_capital, horizon_months)
    }

    /// Mixed strategy targeting `leveraged_ratio : cash_ratio` by property count.
    pub fn mixed(
        initial_capital: Decimal,
        horizon_months: u32,
        leveraged_ratio: Decimal,
        cash_ratio: Decimal,
        first_property_kind: FinancingKind,
    ) -> Self {
        Self::base(
            StrategyKind::Mixed {
                leveraged_ratio,
                cash_ratio,
                first_property_kind,
            },
            initial_capital,
            horizon_months,
        )
    }

    pub fn with_reinvestment(mut self, reinvest: bool) -> Self {
        self.reinvest_cashflow = reinvest;
        self
    }

    pub fn with_refinancing(mut self, policy: RefinancePolicy) -> Self {
        self.refinancing = Some(policy);
        self
    }

    pub fn with_injection(mut self, rule: CapitalInjectionRule) -> Self {
        self.injections.push(rule);
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingFrequency) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn with_cash_reserve_months(mut self, months: u32) -> Self {
        self.cash_reserve_months = months;
        self
    }
}
