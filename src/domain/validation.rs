//! Pre-run validation of an investment definition and strategy.
//!
//! Everything rejected here is rejected before the first period runs; the
//! simulator never discovers configuration problems mid-run.

use crate::domain::{
    CapitalInjectionRule, Decimal, InjectionFrequency, InvestmentDefinition, StrategyConfig,
    StrategyKind,
};
use thiserror::Error;

/// Largest LTV a bond or refinance may be sized to.
pub fn max_ltv() -> Decimal {
    Decimal::new(rust_decimal::Decimal::new(99, 2))
}

/// Tolerance when checking that mixed ratios sum to one.
fn ratio_tolerance() -> Decimal {
    Decimal::new(rust_decimal::Decimal::new(1, 9))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("LTV ratio must be in (0, 0.99], got {0}")]
    InvalidLtv(Decimal),
    #[error("Interest rate must be greater than 0 for leveraged strategies, got {0}")]
    NonPositiveInterestRate(Decimal),
    #[error("Loan term must be at least one month")]
    InvalidLoanTerm,
    #[error("Mixed strategy ratios must sum to 1.0, got {leveraged} + {cash}")]
    MixedRatiosDoNotSum { leveraged: Decimal, cash: Decimal },
    #[error("Mixed strategy ratios must be in [0, 1], got {0}")]
    InvalidMixedRatio(Decimal),
    #[error("Refinance target LTV must be in (0, 0.99], got {0}")]
    InvalidRefinanceLtv(Decimal),
    #[error("Refinance interval must be at least one month")]
    InvalidRefinanceInterval,
    #[error("Purchase price must be greater than 0, got {0}")]
    NonPositivePurchasePrice(Decimal),
    #[error("Simulation horizon must be at least one month")]
    InvalidHorizon,
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("{field} must be in [0, 1], got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },
    #[error("Capital injection #{index}: {reason}")]
    InvalidInjection { index: usize, reason: String },
    #[error("Capital injection #{index}: period {period} is outside the {horizon}-month horizon")]
    InjectionOutsideHorizon {
        index: usize,
        period: u32,
        horizon: u32,
    },
}

/// Validate every input of a run. Returns the first problem found.
pub fn validate(
    investment: &InvestmentDefinition,
    strategy: &StrategyConfig,
) -> Result<(), ConfigurationError> {
    validate_investment(investment)?;
    validate_strategy(investment, strategy)?;
    for (index, rule) in strategy.injections.iter().enumerate() {
        validate_injection(index, rule, strategy.horizon_months)?;
    }
    Ok(())
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ConfigurationError> {
    if value.is_negative() {
        return Err(ConfigurationError::NegativeAmount { field, value });
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: Decimal) -> Result<(), ConfigurationError> {
    if value.is_negative() || value > Decimal::one() {
        return Err(ConfigurationError::RateOutOfRange { field, value });
    }
    Ok(())
}

fn ltv_in_range(value: Decimal) -> bool {
    value.is_positive() && value <= max_ltv()
}

fn validate_investment(investment: &InvestmentDefinition) -> Result<(), ConfigurationError> {
    let costs = &investment.acquisition;
    if !costs.purchase_price.is_positive() {
        return Err(ConfigurationError::NonPositivePurchasePrice(
            costs.purchase_price,
        ));
    }
    non_negative("transfer_duty", costs.transfer_duty)?;
    non_negative("conveyancing_fees", costs.conveyancing_fees)?;
    non_negative("bond_registration", costs.bond_registration)?;
    non_negative("furnishing_cost", costs.furnishing_cost)?;

    let ops = &investment.operating;
    non_negative("monthly_rental_income", ops.monthly_rental_income)?;
    non_negative("monthly_levies", ops.monthly_levies)?;
    non_negative("monthly_insurance", ops.monthly_insurance)?;
    non_negative("monthly_maintenance_reserve", ops.monthly_maintenance_reserve)?;
    non_negative(
        "monthly_furnishing_repair_costs",
        ops.monthly_furnishing_repair_costs,
    )?;
    non_negative("rent_escalation_rate", ops.rent_escalation_rate)?;
    unit_interval("vacancy_rate", ops.vacancy_rate)?;
    unit_interval("management_fee_rate", ops.management_fee_rate)?;

    non_negative("appreciation_rate", investment.financing.appreciation_rate)?;
    Ok(())
}

fn validate_strategy(
    investment: &InvestmentDefinition,
    strategy: &StrategyConfig,
) -> Result<(), ConfigurationError> {
    if strategy.horizon_months == 0 {
        return Err(ConfigurationError::InvalidHorizon);
    }
    non_negative("initial_capital", strategy.initial_capital)?;

    if strategy.kind.uses_leverage() {
        let financing = &investment.financing;
        if !ltv_in_range(financing.ltv_ratio) {
            return Err(ConfigurationError::InvalidLtv(financing.ltv_ratio));
        }
        if !financing.interest_rate.is_positive() {
            return Err(ConfigurationError::NonPositiveInterestRate(
                financing.interest_rate,
            ));
        }
        if financing.loan_term_months == 0 {
            return Err(ConfigurationError::InvalidLoanTerm);
        }
    }

    if let StrategyKind::Mixed {
        leveraged_ratio,
        cash_ratio,
        ..
    } = strategy.kind
    {
        unit_interval("leveraged_ratio", leveraged_ratio)
            .map_err(|_| ConfigurationError::InvalidMixedRatio(leveraged_ratio))?;
        unit_interval("cash_ratio", cash_ratio)
            .map_err(|_| ConfigurationError::InvalidMixedRatio(cash_ratio))?;
        if (leveraged_ratio + cash_ratio - Decimal::one()).abs() > ratio_tolerance() {
            return Err(ConfigurationError::MixedRatiosDoNotSum {
                leveraged: leveraged_ratio,
                cash: cash_ratio,
            });
        }
    }

    if let Some(policy) = &strategy.refinancing {
        if !ltv_in_range(policy.target_ltv) {
            return Err(ConfigurationError::InvalidRefinanceLtv(policy.target_ltv));
        }
        if policy.frequency.interval_months() == 0 {
            return Err(ConfigurationError::InvalidRefinanceInterval);
        }
        non_negative("min_cash_out", policy.min_cash_out)?;
    }

    Ok(())
}

fn validate_injection(
    index: usize,
    rule: &CapitalInjectionRule,
    horizon: u32,
) -> Result<(), ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidInjection {
        index,
        reason: reason.to_string(),
    };

    if !rule.amount.is_positive() {
        return Err(invalid("amount must be greater than 0"));
    }

    if rule.frequency == InjectionFrequency::OneTime {
        if rule.specific_periods.is_empty() {
            return Err(invalid("one-time injection requires at least one period"));
        }
        for period in &rule.specific_periods {
            if period.as_u32() == 0 || period.as_u32() > horizon {
                return Err(ConfigurationError::InjectionOutsideHorizon {
                    index,
                    period: period.as_u32(),
                    horizon,
                });
            }
        }
        return Ok(());
    }

    if rule.start_period.as_u32() == 0 {
        return Err(invalid("start period must be at least 1"));
    }
    if let Some(end) = rule.end_period {
        if end < rule.start_period {
            return Err(invalid("end period precedes start period"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AcquisitionCosts, FinancingKind, FinancingTerms, OperatingTerms, Period,
        RefinanceFrequency, RefinancePolicy,
    };

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn investment() -> InvestmentDefinition {
        InvestmentDefinition::new(
            AcquisitionCosts {
                purchase_price: d("1650000"),
                transfer_duty: d("13200"),
                conveyancing_fees: d("32000"),
                bond_registration: d("22000"),
                furnishing_cost: d("80000"),
            },
            FinancingTerms::leveraged(d("0.5"), d("0.06"), d("0.105"), 20),
            OperatingTerms {
                monthly_rental_income: d("15000"),
                vacancy_rate: d("0.05"),
                monthly_levies: d("2500"),
                management_fee_rate: d("0.08"),
                monthly_insurance: d("800"),
                monthly_maintenance_reserve: d("1000"),
                monthly_furnishing_repair_costs: d("500"),
                rent_escalation_rate: Decimal::zero(),
            },
        )
    }

    #[test]
    fn test_valid_configurations_pass() {
        let inv = investment();
        assert!(validate(&inv, &StrategyConfig::cash_only(d("2000000"), 60)).is_ok());
        assert!(validate(&inv, &StrategyConfig::leveraged(d("2000000"), 60)).is_ok());
        let mixed = StrategyConfig::mixed(d("2000000"), 60, d("0.7"), d("0.3"), FinancingKind::Cash);
        assert!(validate(&inv, &mixed).is_ok());
    }

    #[test]
    fn test_ltv_bounds() {
        let mut inv = investment();
        let strategy = StrategyConfig::leveraged(d("2000000"), 60);

        inv.financing.ltv_ratio = Decimal::zero();
        assert_eq!(
            validate(&inv, &strategy),
            Err(ConfigurationError::InvalidLtv(Decimal::zero()))
        );

        inv.financing.ltv_ratio = d("1");
        assert!(matches!(
            validate(&inv, &strategy),
            Err(ConfigurationError::InvalidLtv(_))
        ));

        inv.financing.ltv_ratio = d("0.99");
        assert!(validate(&inv, &strategy).is_ok());

        // Cash-only runs never look at the LTV.
        inv.financing.ltv_ratio = d("5");
        assert!(validate(&inv, &StrategyConfig::cash_only(d("1"), 12)).is_ok());
    }

    #[test]
    fn test_interest_rate_required_for_leverage() {
        let mut inv = investment();
        inv.financing.interest_rate = Decimal::zero();
        assert!(matches!(
            validate(&inv, &StrategyConfig::leveraged(d("1"), 12)),
            Err(ConfigurationError::NonPositiveInterestRate(_))
        ));
        assert!(validate(&inv, &StrategyConfig::cash_only(d("1"), 12)).is_ok());
    }

    #[test]
    fn test_mixed_ratios_must_sum_to_one() {
        let inv = investment();
        let bad = StrategyConfig::mixed(d("1"), 12, d("0.6"), d("0.3"), FinancingKind::Cash);
        assert!(matches!(
            validate(&inv, &bad),
            Err(ConfigurationError::MixedRatiosDoNotSum { .. })
        ));

        let negative = StrategyConfig::mixed(d("1"), 12, d("1.2"), d("-0.2"), FinancingKind::Cash);
        assert!(matches!(
            validate(&inv, &negative),
            Err(ConfigurationError::InvalidMixedRatio(_))
        ));
    }

    #[test]
    fn test_refinance_policy_checks() {
        let inv = investment();
        let bad_ltv = StrategyConfig::leveraged(d("1"), 12)
            .with_refinancing(RefinancePolicy::new(RefinanceFrequency::Annually, d("1.5")));
        assert!(matches!(
            validate(&inv, &bad_ltv),
            Err(ConfigurationError::InvalidRefinanceLtv(_))
        ));

        let bad_interval = StrategyConfig::leveraged(d("1"), 12)
            .with_refinancing(RefinancePolicy::new(RefinanceFrequency::EveryMonths(0), d("0.6")));
        assert_eq!(
            validate(&inv, &bad_interval),
            Err(ConfigurationError::InvalidRefinanceInterval)
        );
    }

    #[test]
    fn test_horizon_and_amounts() {
        let mut inv = investment();
        assert_eq!(
            validate(&inv, &StrategyConfig::cash_only(d("1"), 0)),
            Err(ConfigurationError::InvalidHorizon)
        );

        inv.acquisition.purchase_price = Decimal::zero();
        assert!(matches!(
            validate(&inv, &StrategyConfig::cash_only(d("1"), 12)),
            Err(ConfigurationError::NonPositivePurchasePrice(_))
        ));

        let mut inv = investment();
        inv.operating.vacancy_rate = d("1.5");
        let err = validate(&inv, &StrategyConfig::cash_only(d("1"), 12)).unwrap_err();
        assert!(err.to_string().contains("vacancy_rate"));

        let inv = investment();
        let err = validate(&inv, &StrategyConfig::cash_only(d("-1"), 12)).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NegativeAmount {
                field: "initial_capital",
                ..
            }
        ));
    }

    #[test]
    fn test_injection_rules() {
        let inv = investment();
        let base = StrategyConfig::cash_only(d("1"), 24);

        let zero_amount = base.clone().with_injection(CapitalInjectionRule::recurring(
            Decimal::zero(),
            InjectionFrequency::Monthly,
            Period::new(1),
            None,
        ));
        assert!(matches!(
            validate(&inv, &zero_amount),
            Err(ConfigurationError::InvalidInjection { index: 0, .. })
        ));

        let inverted = base.clone().with_injection(CapitalInjectionRule::recurring(
            d("10"),
            InjectionFrequency::Monthly,
            Period::new(10),
            Some(Period::new(5)),
        ));
        assert!(validate(&inv, &inverted).is_err());

        let beyond = base
            .clone()
            .with_injection(CapitalInjectionRule::one_time(d("10"), vec![Period::new(3)]))
            .with_injection(CapitalInjectionRule::one_time(d("10"), vec![Period::new(25)]));
        assert_eq!(
            validate(&inv, &beyond),
            Err(ConfigurationError::InjectionOutsideHorizon {
                index: 1,
                period: 25,
                horizon: 24
            })
        );

        let empty = base.with_injection(CapitalInjectionRule::one_time(d("10"), vec![]));
        assert!(validate(&inv, &empty).is_err());
    }
}
