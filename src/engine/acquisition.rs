//! Acquisition policy: which financing kind the next purchase uses.

use crate::domain::{Decimal, FinancingKind, StrategyKind};

/// Running count of purchases per financing kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcquisitionCounts {
    pub leveraged: usize,
    pub cash: usize,
}

impl AcquisitionCounts {
    pub fn record(&mut self, kind: FinancingKind) {
        match kind {
            FinancingKind::Cash => self.cash += 1,
            FinancingKind::Leveraged => self.leveraged += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.leveraged + self.cash
    }
}

/// Financing kind of the next purchase.
///
/// Mixed strategies pick the kind whose realized share lags its target the
/// most; ties and the very first purchase use `first_property_kind`.
pub fn next_kind(strategy: &StrategyKind, counts: &AcquisitionCounts) -> FinancingKind {
    match strategy {
        StrategyKind::CashOnly => FinancingKind::Cash,
        StrategyKind::Leveraged => FinancingKind::Leveraged,
        StrategyKind::Mixed {
            leveraged_ratio,
            cash_ratio,
            first_property_kind,
        } => {
            let total = counts.total();
            if total == 0 {
                return *first_property_kind;
            }
            let total = Decimal::from(total);
            let leveraged_deficit = *leveraged_ratio - Decimal::from(counts.leveraged) / total;
            let cash_deficit = *cash_ratio - Decimal::from(counts.cash) / total;

            if leveraged_deficit > cash_deficit {
                FinancingKind::Leveraged
            } else if cash_deficit > leveraged_deficit {
                FinancingKind::Cash
            } else {
                *first_property_kind
            }
        }
    }
}
