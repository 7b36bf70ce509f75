//! Emitted portfolio state: per-period snapshots, property details, yields.

use crate::domain::{Decimal, FinancingKind, Period, PropertyId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a run stopped before its horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EndReason {
    /// The month's net cash flow would have pushed cash below zero.
    CashDeficit {
        period: Period,
        shortfall: Decimal,
        cash_available: Decimal,
    },
    /// Nothing could be bought and no further capital can arrive.
    InsufficientCapital {
        required: Decimal,
        available: Decimal,
    },
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::CashDeficit {
                period,
                shortfall,
                cash_available,
            } => write!(
                f,
                "Cash deficit in month {}: shortfall of {} with {} available",
                period,
                shortfall.round_dp(2),
                cash_available.round_dp(2)
            ),
            EndReason::InsufficientCapital {
                required,
                available,
            } => write!(
                f,
                "Insufficient capital: {} required for the first property, {} available",
                required.round_dp(2),
                available.round_dp(2)
            ),
        }
    }
}

/// Yield figures of a single property, all annual fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyYields {
    pub rental_yield: Decimal,
    pub net_rental_yield: Decimal,
    pub cash_on_cash_return: Decimal,
    pub capital_growth: Decimal,
    pub total_return: Decimal,
}

/// Portfolio-level yields aggregated over every owned property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortfolioYields {
    pub rental_yield: Decimal,
    pub net_rental_yield: Decimal,
    pub cash_on_cash_return: Decimal,
    /// Value-weighted average of the per-property capital growth.
    pub capital_growth: Decimal,
    pub total_return: Decimal,
}

/// State of one property at the end of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetail {
    pub property_id: PropertyId,
    pub kind: FinancingKind,
    pub purchase_period: Period,
    pub purchase_price: Decimal,
    pub acquisition_cost: Decimal,
    pub acquisition_ltv: Decimal,
    pub current_value: Decimal,
    pub loan_balance: Decimal,
    pub equity: Decimal,
    pub monthly_payment: Decimal,
    pub months_owned: u32,
    pub monthly_rent: Decimal,
    pub monthly_expenses: Decimal,
    pub monthly_cashflow: Decimal,
    pub cash_invested: Decimal,
    pub interest_paid: Decimal,
    pub principal_paid: Decimal,
    pub yields: PropertyYields,
}

/// Aggregated portfolio state at the end of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub period: Period,
    pub total_property_value: Decimal,
    pub total_debt: Decimal,
    pub total_equity: Decimal,
    pub monthly_cashflow: Decimal,
    /// Monthly cash flow times twelve.
    pub annual_cashflow: Decimal,
    pub cash_available: Decimal,
    pub property_count: usize,
    pub total_cash_invested: Decimal,
    pub total_capital_injected: Decimal,
    /// Equity plus uninvested cash.
    pub net_worth: Decimal,
    /// Unfunded part of the month's cash flow; zero unless the run ended on a deficit.
    pub cash_shortfall: Decimal,
    pub properties: Vec<PropertyDetail>,
    pub yields: PortfolioYields,
    pub simulation_ended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
}

impl PortfolioSnapshot {
    /// Loan-to-value of the whole portfolio; zero with no property value.
    pub fn portfolio_ltv(&self) -> Decimal {
        self.total_debt.ratio_or_zero(self.total_property_value)
    }

    pub fn leveraged_count(&self) -> usize {
        self.properties
            .iter()
            .filter(|p| p.kind.is_leveraged())
            .count()
    }
}
