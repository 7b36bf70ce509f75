//! Discrete portfolio events recorded in the run ledger.

use crate::domain::{Decimal, FinancingKind, InjectionFrequency, Period, PropertyId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub period: Period,
    pub property_id: PropertyId,
    pub kind: FinancingKind,
    pub purchase_price: Decimal,
    pub loan_amount: Decimal,
    pub cash_required: Decimal,
    pub monthly_payment: Decimal,
    /// Cash left after the purchase.
    pub cash_after: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceEvent {
    pub period: Period,
    pub property_id: PropertyId,
    pub property_value: Decimal,
    pub old_loan_balance: Decimal,
    pub new_loan_balance: Decimal,
    pub cash_extracted: Decimal,
    pub new_ltv: Decimal,
    pub new_monthly_payment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionEvent {
    pub period: Period,
    /// Position of the matching rule in the strategy's injection list.
    pub rule_index: usize,
    pub amount: Decimal,
    pub frequency: InjectionFrequency,
    pub total_injected_to_date: Decimal,
}

/// One entry of the append-only event ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    Purchase(PurchaseEvent),
    Refinance(RefinanceEvent),
    Injection(InjectionEvent),
}

impl Event {
    pub fn period(&self) -> Period {
        match self {
            Event::Purchase(e) => e.period,
            Event::Refinance(e) => e.period,
            Event::Injection(e) => e.period,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Purchase(_) => "purchase",
            Event::Refinance(_) => "refinance",
            Event::Injection(_) => "injection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_period_and_tag() {
        let event = Event::Injection(InjectionEvent {
            period: Period::new(4),
            rule_index: 1,
            amount: Decimal::from(500000i64),
            frequency: InjectionFrequency::OneTime,
            total_injected_to_date: Decimal::from(500000i64),
        });
        assert_eq!(event.period(), Period::new(4));
        assert_eq!(event.as_str(), "injection");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "injection");
        assert_eq!(json["period"], 4);
        assert_eq!(json["frequency"], "one_time");
    }
}
