//! Yield and return ratios for single properties and whole portfolios.
//!
//! Every ratio is an annual fraction. A zero denominator yields zero.

use crate::domain::{Decimal, PortfolioYields, PropertyYields};

/// Annualized monthly figures of one property, the input to every yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YieldInputs {
    pub value: Decimal,
    pub monthly_gross_rent: Decimal,
    pub monthly_net_operating_income: Decimal,
    pub monthly_cashflow: Decimal,
    pub cash_invested: Decimal,
    pub capital_growth: Decimal,
}

pub fn rental_yield(annual_gross_rent: Decimal, value: Decimal) -> Decimal {
    annual_gross_rent.ratio_or_zero(value)
}

pub fn net_rental_yield(annual_net_operating_income: Decimal, value: Decimal) -> Decimal {
    annual_net_operating_income.ratio_or_zero(value)
}

pub fn cash_on_cash_return(annual_cashflow: Decimal, cash_invested: Decimal) -> Decimal {
    annual_cashflow.ratio_or_zero(cash_invested)
}

/// Growth over the last twelve months.
pub fn trailing_growth(current: Decimal, year_ago: Decimal) -> Decimal {
    if year_ago.is_zero() {
        return Decimal::zero();
    }
    current / year_ago - Decimal::one()
}

/// Growth from `base` to `current` over `months`, annualized by compounding.
///
/// Zero months or a zero base give zero. If the fractional power cannot be
/// evaluated the growth is annualized linearly instead.
pub fn annualized_growth(current: Decimal, base: Decimal, months: u32) -> Decimal {
    if months == 0 || base.is_zero() {
        return Decimal::zero();
    }
    let ratio = current / base;
    let months = Decimal::from(months);
    let exponent = Decimal::twelve() / months;
    match ratio.checked_powd(exponent) {
        Some(compounded) => compounded - Decimal::one(),
        None => (ratio - Decimal::one()) * exponent,
    }
}

pub fn property_yields(inputs: &YieldInputs) -> PropertyYields {
    let twelve = Decimal::twelve();
    let net_rental_yield =
        net_rental_yield(inputs.monthly_net_operating_income * twelve, inputs.value);

    PropertyYields {
        rental_yield: rental_yield(inputs.monthly_gross_rent * twelve, inputs.value),
        net_rental_yield,
        cash_on_cash_return: cash_on_cash_return(
            inputs.monthly_cashflow * twelve,
            inputs.cash_invested,
        ),
        capital_growth: inputs.capital_growth,
        total_return: net_rental_yield + inputs.capital_growth,
    }
}

/// Aggregate yields: summed income over summed value, value-weighted growth.
pub fn portfolio_yields(items: &[YieldInputs]) -> PortfolioYields {
    let twelve = Decimal::twelve();
    let total_value: Decimal = items.iter().map(|i| i.value).sum();
    let gross: Decimal = items.iter().map(|i| i.monthly_gross_rent).sum();
    let noi: Decimal = items.iter().map(|i| i.monthly_net_operating_income).sum();
    let cashflow: Decimal = items.iter().map(|i| i.monthly_cashflow).sum();
    let invested: Decimal = items.iter().map(|i| i.cash_invested).sum();
    let weighted_growth: Decimal = items.iter().map(|i| i.capital_growth * i.value).sum();

    let net_rental_yield = net_rental_yield(noi * twelve, total_value);
    let capital_growth = weighted_growth.ratio_or_zero(total_value);

    PortfolioYields {
        rental_yield: rental_yield(gross * twelve, total_value),
        net_rental_yield,
        cash_on_cash_return: cash_on_cash_return(cashflow * twelve, invested),
        capital_growth,
        total_return: net_rental_yield + capital_growth,
    }
}
