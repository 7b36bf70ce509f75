//! Financial primitives: PMT, interest/principal split, monthly compounding.
//!
//! All functions are pure. Rates are annual nominal rates; the monthly rate is
//! always `annual_rate / 12`.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A loan with a positive principal and no repayment term.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid financing: loan of {principal} requires a positive term, got {term_months} months")]
pub struct InvalidFinancingError {
    pub principal: Decimal,
    pub term_months: u32,
}

/// One month's debt service split into its interest and principal parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub interest: Decimal,
    pub principal: Decimal,
}

impl PaymentSplit {
    /// Cash actually paid this month.
    pub fn total(&self) -> Decimal {
        self.interest + self.principal
    }
}

/// Monthly rate for an annual nominal rate.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / Decimal::twelve()
}

/// Fixed monthly payment of a fully amortizing loan.
///
/// Zero principal pays nothing. A zero rate repays principal straight-line.
pub fn monthly_payment(
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
) -> Result<Decimal, InvalidFinancingError> {
    if !principal.is_positive() {
        return Ok(Decimal::zero());
    }
    if term_months == 0 {
        return Err(InvalidFinancingError {
            principal,
            term_months,
        });
    }

    let n = Decimal::from(term_months);
    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return Ok(principal / n);
    }

    // (1 + r)^n overflows only for absurd inputs; fall back to interest-only.
    let growth = match (Decimal::one() + r).checked_powi(i64::from(term_months)) {
        Some(g) => g,
        None => return Ok(principal * r),
    };
    Ok(principal * (r * growth) / (growth - Decimal::one()))
}

/// Split one payment against the current balance.
///
/// Negative amortization is not supported: when the payment does not cover the
/// interest the principal part is zero. The principal part never exceeds the
/// balance, so the final payment clears the loan exactly.
pub fn split_payment(
    remaining_balance: Decimal,
    annual_rate: Decimal,
    payment: Decimal,
) -> PaymentSplit {
    if !remaining_balance.is_positive() {
        return PaymentSplit::default();
    }

    let interest = remaining_balance * monthly_rate(annual_rate);
    let principal = (payment - interest).floor_zero().min(remaining_balance);

    PaymentSplit {
        interest,
        principal,
    }
}

/// One month of compounding at an annual rate.
pub fn compound_monthly(value: Decimal, annual_rate: Decimal) -> Decimal {
    value * (Decimal::one() + monthly_rate(annual_rate))
}
