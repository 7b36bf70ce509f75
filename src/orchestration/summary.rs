//! Per-strategy summaries and the net-worth comparison table.

use serde::{Deserialize, Serialize};

use crate::domain::Decimal;
use crate::engine::SimulationResult;

/// Headline figures of a finished run, taken from its final snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StrategySummary {
    pub final_period: u32,
    pub final_property_count: usize,
    pub leveraged_property_count: usize,
    pub final_portfolio_value: Decimal,
    pub final_debt: Decimal,
    pub final_equity: Decimal,
    pub cash_available: Decimal,
    pub net_worth: Decimal,
    pub monthly_cashflow: Decimal,
    pub total_cash_invested: Decimal,
    pub total_capital_injected: Decimal,
    pub total_return: Decimal,
    pub simulation_ended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<String>,
}

impl StrategySummary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let end_reason = result.state.end_reason().map(|r| r.to_string());
        let Some(last) = result.final_snapshot() else {
            return Self {
                simulation_ended: end_reason.is_some(),
                end_reason,
                ..Self::default()
            };
        };

        Self {
            final_period: last.period.as_u32(),
            final_property_count: last.property_count,
            leveraged_property_count: last.leveraged_count(),
            final_portfolio_value: last.total_property_value,
            final_debt: last.total_debt,
            final_equity: last.total_equity,
            cash_available: last.cash_available,
            net_worth: last.net_worth,
            monthly_cashflow: last.monthly_cashflow,
            total_cash_invested: last.total_cash_invested,
            total_capital_injected: last.total_capital_injected,
            total_return: last.yields.total_return,
            simulation_ended: last.simulation_ended,
            end_reason,
        }
    }
}

/// One row of a strategy comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub rank: usize,
    pub name: String,
    pub net_worth: Decimal,
    pub final_equity: Decimal,
    pub final_property_count: usize,
    pub monthly_cashflow: Decimal,
    pub simulation_ended: bool,
}

/// Rank summaries by net worth, highest first. Ties break on name.
pub fn compare_by_net_worth<'a, I>(summaries: I) -> Vec<ComparisonEntry>
where
    I: IntoIterator<Item = (&'a str, &'a StrategySummary)>,
{
    let mut rows: Vec<(&str, &StrategySummary)> = summaries.into_iter().collect();
    rows.sort_by(|a, b| {
        b.1.net_worth
            .cmp(&a.1.net_worth)
            .then_with(|| a.0.cmp(b.0))
    });

    rows.into_iter()
        .enumerate()
        .map(|(idx, (name, s))| ComparisonEntry {
            rank: idx + 1,
            name: name.to_string(),
            net_worth: s.net_worth,
            final_equity: s.final_equity,
            final_property_count: s.final_property_count,
            monthly_cashflow: s.monthly_cashflow,
            simulation_ended: s.simulation_ended,
        })
        .collect()
}
