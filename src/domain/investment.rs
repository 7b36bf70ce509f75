//! Investment definition: one property's acquisition, financing and operating terms.

use crate::domain::{Decimal, FinancingKind};
use crate::engine::finance::{monthly_payment, InvalidFinancingError};
use serde::{Deserialize, Serialize};

/// One-off costs of acquiring a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    pub purchase_price: Decimal,
    pub transfer_duty: Decimal,
    pub conveyancing_fees: Decimal,
    /// Bond registration; only paid on leveraged purchases.
    pub bond_registration: Decimal,
    #[serde(default)]
    pub furnishing_cost: Decimal,
}

impl AcquisitionCosts {
    pub fn total_unfurnished_cost(&self) -> Decimal {
        self.purchase_price + self.transfer_duty + self.conveyancing_fees + self.bond_registration
    }

    pub fn total_furnished_cost(&self) -> Decimal {
        self.total_unfurnished_cost() + self.furnishing_cost
    }

    /// Costs paid in cash on top of the equity share of the price.
    fn closing_costs(&self, kind: FinancingKind) -> Decimal {
        let bond = match kind {
            FinancingKind::Cash => Decimal::zero(),
            FinancingKind::Leveraged => self.bond_registration,
        };
        self.transfer_duty + self.conveyancing_fees + bond + self.furnishing_cost
    }
}

/// Loan and appreciation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// Loan-to-value ratio at acquisition. Ignored for cash purchases.
    #[serde(default)]
    pub ltv_ratio: Decimal,
    pub financing_kind: FinancingKind,
    /// Annual property appreciation rate.
    #[serde(default)]
    pub appreciation_rate: Decimal,
    /// Annual nominal bond interest rate.
    #[serde(default)]
    pub interest_rate: Decimal,
    #[serde(default = "default_loan_term_months")]
    pub loan_term_months: u32,
}

fn default_loan_term_months() -> u32 {
    240
}

impl FinancingTerms {
    pub fn cash(appreciation_rate: Decimal) -> Self {
        Self {
            ltv_ratio: Decimal::zero(),
            financing_kind: FinancingKind::Cash,
            appreciation_rate,
            interest_rate: Decimal::zero(),
            loan_term_months: default_loan_term_months(),
        }
    }

    pub fn leveraged(
        ltv_ratio: Decimal,
        appreciation_rate: Decimal,
        interest_rate: Decimal,
        loan_term_years: u32,
    ) -> Self {
        Self {
            ltv_ratio,
            financing_kind: FinancingKind::Leveraged,
            appreciation_rate,
            interest_rate,
            loan_term_months: loan_term_years * 12,
        }
    }
}

/// Recurring income and expenses of one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingTerms {
    pub monthly_rental_income: Decimal,
    /// Fraction of the month the property stands empty.
    pub vacancy_rate: Decimal,
    pub monthly_levies: Decimal,
    /// Fraction of effective (post-vacancy) rent.
    pub management_fee_rate: Decimal,
    pub monthly_insurance: Decimal,
    pub monthly_maintenance_reserve: Decimal,
    #[serde(default)]
    pub monthly_furnishing_repair_costs: Decimal,
    /// Annual growth of the rent, compounded monthly.
    #[serde(default)]
    pub rent_escalation_rate: Decimal,
}

impl OperatingTerms {
    pub fn annual_rental_income(&self) -> Decimal {
        self.monthly_rental_income * Decimal::twelve()
    }

    /// Operating figures for a given gross monthly rent.
    pub fn breakdown_for_rent(&self, monthly_rent: Decimal) -> OperatingBreakdown {
        let effective_rent = monthly_rent * (Decimal::one() - self.vacancy_rate);
        let management_fee = effective_rent * self.management_fee_rate;
        let operating_expenses = self.monthly_levies
            + management_fee
            + self.monthly_insurance
            + self.monthly_maintenance_reserve
            + self.monthly_furnishing_repair_costs;

        OperatingBreakdown {
            gross_rent: monthly_rent,
            effective_rent,
            management_fee,
            operating_expenses,
        }
    }

    pub fn breakdown(&self) -> OperatingBreakdown {
        self.breakdown_for_rent(self.monthly_rental_income)
    }
}

/// Monthly operating figures before debt service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingBreakdown {
    pub gross_rent: Decimal,
    pub effective_rent: Decimal,
    pub management_fee: Decimal,
    pub operating_expenses: Decimal,
}

impl OperatingBreakdown {
    /// Net operating income: effective rent minus opex.
    pub fn net_operating_income(&self) -> Decimal {
        self.effective_rent - self.operating_expenses
    }
}

/// Cash needed and debt taken on for a single purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseQuote {
    pub kind: FinancingKind,
    pub purchase_price: Decimal,
    pub loan_amount: Decimal,
    pub cash_required: Decimal,
    pub monthly_payment: Decimal,
}

/// A complete, immutable description of the property being replicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentDefinition {
    pub acquisition: AcquisitionCosts,
    pub financing: FinancingTerms,
    pub operating: OperatingTerms,
}

impl InvestmentDefinition {
    pub fn new(
        acquisition: AcquisitionCosts,
        financing: FinancingTerms,
        operating: OperatingTerms,
    ) -> Self {
        Self {
            acquisition,
            financing,
            operating,
        }
    }

    /// Loan for a purchase of `kind` at `price` and this definition's LTV.
    pub fn loan_amount_at(&self, kind: FinancingKind, price: Decimal) -> Decimal {
        match kind {
            FinancingKind::Cash => Decimal::zero(),
            FinancingKind::Leveraged => (price * self.financing.ltv_ratio).round_dp(2),
        }
    }

    /// Price, loan, cash outlay and payment for buying one property as `kind`
    /// at the base purchase price.
    pub fn quote(&self, kind: FinancingKind) -> Result<PurchaseQuote, InvalidFinancingError> {
        self.quote_at(kind, self.acquisition.purchase_price)
    }

    /// Quote at a market price. Every closing cost scales with the ratio of
    /// `purchase_price` to the base price.
    pub fn quote_at(
        &self,
        kind: FinancingKind,
        purchase_price: Decimal,
    ) -> Result<PurchaseQuote, InvalidFinancingError> {
        let price_ratio = purchase_price.ratio_or_zero(self.acquisition.purchase_price);
        let loan_amount = self.loan_amount_at(kind, purchase_price);
        let cash_required = purchase_price - loan_amount
            + self.acquisition.closing_costs(kind) * price_ratio;
        let monthly_payment = monthly_payment(
            loan_amount,
            self.financing.interest_rate,
            self.financing.loan_term_months,
        )?;

        Ok(PurchaseQuote {
            kind,
            purchase_price,
            loan_amount,
            cash_required,
            monthly_payment,
        })
    }

    /// Loan at acquisition under the definition's own financing kind.
    pub fn loan_amount(&self) -> Decimal {
        self.loan_amount_at(
            self.financing.financing_kind,
            self.acquisition.purchase_price,
        )
    }

    /// Cash outlay under the definition's own financing kind.
    pub fn initial_cash_required(&self) -> Result<Decimal, InvalidFinancingError> {
        self.quote(self.financing.financing_kind)
            .map(|q| q.cash_required)
    }

    /// Monthly bond payment under the definition's own financing kind.
    pub fn monthly_debt_service(&self) -> Result<Decimal, InvalidFinancingError> {
        self.quote(self.financing.financing_kind)
            .map(|q| q.monthly_payment)
    }

    /// Net monthly cash flow of one property after debt service.
    pub fn monthly_cashflow(&self) -> Result<Decimal, InvalidFinancingError> {
        let noi = self.operating.breakdown().net_operating_income();
        Ok(noi - self.monthly_debt_service()?)
    }
}
