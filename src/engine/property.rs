//! Mutable state of one property owned by a running simulation.

use std::collections::VecDeque;

use crate::domain::{
    Decimal, FinancingKind, OperatingBreakdown, OperatingTerms, Period, PropertyDetail, PropertyId,
    PurchaseQuote,
};
use crate::engine::finance::{compound_monthly, split_payment, PaymentSplit};
use crate::engine::yields::{annualized_growth, property_yields, trailing_growth, YieldInputs};

/// Month-end values kept for trailing growth: the current value plus twelve prior.
const VALUE_HISTORY_LEN: usize = 13;

/// One month of income and debt service for a property, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAccrual {
    pub operating: OperatingBreakdown,
    pub debt_service: PaymentSplit,
}

impl MonthAccrual {
    /// Net cash flow after opex and debt service.
    pub fn net_cashflow(&self) -> Decimal {
        self.operating.net_operating_income() - self.debt_service.total()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedProperty {
    pub id: PropertyId,
    pub kind: FinancingKind,
    pub purchase_period: Period,
    pub purchase_price: Decimal,
    /// Price plus closing costs, however financed.
    pub acquisition_cost: Decimal,
    pub acquisition_ltv: Decimal,
    pub current_value: Decimal,
    pub loan_balance: Decimal,
    pub monthly_payment: Decimal,
    pub months_owned: u32,
    /// Cost basis: cash paid at acquisition.
    pub cash_invested: Decimal,
    pub monthly_rent: Decimal,
    value_history: VecDeque<Decimal>,
    last_payment: PaymentSplit,
}

impl OwnedProperty {
    pub fn acquire(id: PropertyId, period: Period, quote: &PurchaseQuote, rent: Decimal) -> Self {
        let mut value_history = VecDeque::with_capacity(VALUE_HISTORY_LEN);
        value_history.push_back(quote.purchase_price);

        Self {
            id,
            kind: quote.kind,
            purchase_period: period,
            purchase_price: quote.purchase_price,
            acquisition_cost: quote.cash_required + quote.loan_amount,
            acquisition_ltv: quote.loan_amount.ratio_or_zero(quote.purchase_price),
            current_value: quote.purchase_price,
            loan_balance: quote.loan_amount,
            monthly_payment: quote.monthly_payment,
            months_owned: 0,
            cash_invested: quote.cash_required,
            monthly_rent: rent,
            value_history,
            last_payment: PaymentSplit::default(),
        }
    }

    pub fn equity(&self) -> Decimal {
        self.current_value - self.loan_balance
    }

    /// This month's figures at the current rent and balance. Does not mutate.
    pub fn accrue(&self, operating: &OperatingTerms, annual_rate: Decimal) -> MonthAccrual {
        MonthAccrual {
            operating: operating.breakdown_for_rent(self.monthly_rent),
            debt_service: split_payment(self.loan_balance, annual_rate, self.monthly_payment),
        }
    }

    /// Apply a staged accrual. The payment stops once the loan is repaid.
    pub fn commit(&mut self, accrual: &MonthAccrual) {
        self.loan_balance -= accrual.debt_service.principal;
        self.last_payment = accrual.debt_service;
        if !self.loan_balance.is_positive() {
            self.loan_balance = Decimal::zero();
            self.monthly_payment = Decimal::zero();
        }
    }

    /// Month-end appreciation and rent escalation.
    pub fn appreciate(&mut self, appreciation_rate: Decimal, rent_escalation_rate: Decimal) {
        self.current_value = compound_monthly(self.current_value, appreciation_rate);
        self.monthly_rent = compound_monthly(self.monthly_rent, rent_escalation_rate);
        self.months_owned += 1;

        self.value_history.push_back(self.current_value);
        while self.value_history.len() > VALUE_HISTORY_LEN {
            self.value_history.pop_front();
        }
    }

    /// Replace the loan with a larger one sized to `new_balance`.
    pub fn refinance(&mut self, new_balance: Decimal, new_payment: Decimal) {
        self.loan_balance = new_balance;
        self.monthly_payment = new_payment;
    }

    /// Annual capital growth: trailing twelve months once owned that long,
    /// otherwise growth since purchase annualized.
    pub fn capital_growth(&self) -> Decimal {
        if self.value_history.len() == VALUE_HISTORY_LEN {
            let year_ago = self.value_history.front().copied().unwrap_or_default();
            trailing_growth(self.current_value, year_ago)
        } else {
            annualized_growth(self.current_value, self.purchase_price, self.months_owned)
        }
    }

    fn yield_inputs(&self, accrual: &MonthAccrual) -> YieldInputs {
        YieldInputs {
            value: self.current_value,
            monthly_gross_rent: accrual.operating.gross_rent,
            monthly_net_operating_income: accrual.operating.net_operating_income(),
            monthly_cashflow: accrual.net_cashflow(),
            cash_invested: self.cash_invested,
            capital_growth: self.capital_growth(),
        }
    }

    /// Reporting row and yield inputs, both from next month's accrual at
    /// current terms.
    pub fn report(
        &self,
        operating: &OperatingTerms,
        annual_rate: Decimal,
    ) -> (PropertyDetail, YieldInputs) {
        let accrual = self.accrue(operating, annual_rate);
        let inputs = self.yield_inputs(&accrual);

        let detail = PropertyDetail {
            property_id: self.id,
            kind: self.kind,
            purchase_period: self.purchase_period,
            purchase_price: self.purchase_price,
            acquisition_cost: self.acquisition_cost,
            acquisition_ltv: self.acquisition_ltv,
            current_value: self.current_value,
            loan_balance: self.loan_balance,
            equity: self.equity(),
            monthly_payment: self.monthly_payment,
            months_owned: self.months_owned,
            monthly_rent: self.monthly_rent,
            monthly_expenses: accrual.operating.operating_expenses,
            monthly_cashflow: inputs.monthly_cashflow,
            cash_invested: self.cash_invested,
            interest_paid: self.last_payment.interest,
            principal_paid: self.last_payment.principal,
            yields: property_yields(&inputs),
        };
        (detail, inputs)
    }
}
