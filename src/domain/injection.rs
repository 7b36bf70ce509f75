//! Capital injection rules and their per-period resolution.

use crate::domain::{Decimal, Period};
use serde::{Deserialize, Serialize};

/// How often an injection rule pays in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionFrequency {
    Monthly,
    Quarterly,
    Yearly,
    FiveYearly,
    /// Only on the explicitly listed periods.
    OneTime,
}

impl InjectionFrequency {
    /// Months between payments; None for one-time rules.
    pub fn interval_months(&self) -> Option<u32> {
        match self {
            InjectionFrequency::Monthly => Some(1),
            InjectionFrequency::Quarterly => Some(3),
            InjectionFrequency::Yearly => Some(12),
            InjectionFrequency::FiveYearly => Some(60),
            InjectionFrequency::OneTime => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InjectionFrequency::Monthly => "monthly",
            InjectionFrequency::Quarterly => "quarterly",
            InjectionFrequency::Yearly => "yearly",
            InjectionFrequency::FiveYearly => "five_yearly",
            InjectionFrequency::OneTime => "one_time",
        }
    }
}

impl std::fmt::Display for InjectionFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_start_period() -> Period {
    Period::new(1)
}

/// A declarative rule adding outside capital to the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalInjectionRule {
    pub amount: Decimal,
    pub frequency: InjectionFrequency,
    #[serde(default = "default_start_period")]
    pub start_period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_period: Option<Period>,
    /// Periods of a one-time rule. Ignored by recurring rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specific_periods: Vec<Period>,
}

impl CapitalInjectionRule {
    /// Recurring rule starting at `start` and running until `end` (inclusive).
    pub fn recurring(
        amount: Decimal,
        frequency: InjectionFrequency,
        start: Period,
        end: Option<Period>,
    ) -> Self {
        Self {
            amount,
            frequency,
            start_period: start,
            end_period: end,
            specific_periods: Vec::new(),
        }
    }

    /// One-time rule paying on each listed period.
    pub fn one_time(amount: Decimal, periods: Vec<Period>) -> Self {
        Self {
            amount,
            frequency: InjectionFrequency::OneTime,
            start_period: default_start_period(),
            end_period: None,
            specific_periods: periods,
        }
    }

    /// Amount paid in `period`, if the rule matches it.
    pub fn resolve(&self, period: Period) -> Option<Decimal> {
        let matches = match self.frequency.interval_months() {
            None => self.specific_periods.contains(&period),
            Some(interval) => {
                period >= self.start_period
                    && self.end_period.map_or(true, |end| period <= end)
                    && (period.as_u32() - self.start_period.as_u32()) % interval == 0
            }
        };
        matches.then_some(self.amount)
    }
}

/// Sum of every rule matching `period`.
pub fn resolve_all(rules: &[CapitalInjectionRule], period: Period) -> Option<Decimal> {
    let mut total: Option<Decimal> = None;
    for amount in rules.iter().filter_map(|rule| rule.resolve(period)) {
        total = Some(total.unwrap_or_default() + amount);
    }
    total
}
