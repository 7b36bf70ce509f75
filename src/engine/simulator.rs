//! Month-by-month portfolio simulation.
//!
//! A run advances through periods `1..=horizon_months`. Each period applies,
//! in order: capital injections, rent and expense accrual (staged, then
//! committed only if cash stays non-negative), appreciation, refinancing,
//! acquisitions, and finally the snapshot. A run ends early on a cash deficit
//! or when it can never buy a property; neither is an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    resolve_all, validate, ConfigurationError, Decimal, EndReason, Event,
    InjectionEvent, InvestmentDefinition, Period, PortfolioSnapshot, PropertyId, PurchaseEvent,
    PurchaseQuote, RefinanceEvent, StrategyConfig,
};
use crate::engine::acquisition::{next_kind, AcquisitionCounts};
use crate::engine::finance::{monthly_payment, InvalidFinancingError};
use crate::engine::property::{MonthAccrual, OwnedProperty};
use crate::engine::yields::portfolio_yields;

/// Shared cancellation signal, checked at the top of every period.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Financing(#[from] InvalidFinancingError),
    #[error("Simulation cancelled before period {period}")]
    Cancelled { period: Period },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SimulationState {
    Running,
    TerminatedEarly(EndReason),
    Completed,
}

impl SimulationState {
    pub fn end_reason(&self) -> Option<&EndReason> {
        match self {
            SimulationState::TerminatedEarly(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub events: Vec<Event>,
    pub state: SimulationState,
}

impl SimulationResult {
    pub fn final_snapshot(&self) -> Option<&PortfolioSnapshot> {
        self.snapshots.last()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SimulationState::Completed
    }
}

/// Run a simulation to completion.
pub fn simulate(
    investment: &InvestmentDefinition,
    strategy: &StrategyConfig,
) -> Result<SimulationResult, SimulationError> {
    simulate_with_cancel(investment, strategy, &CancelFlag::new())
}

/// Run a simulation that stops with `SimulationError::Cancelled` once `cancel` is raised.
pub fn simulate_with_cancel(
    investment: &InvestmentDefinition,
    strategy: &StrategyConfig,
    cancel: &CancelFlag,
) -> Result<SimulationResult, SimulationError> {
    Simulator::new(investment, strategy)?.run(cancel)
}

pub struct Simulator<'a> {
    investment: &'a InvestmentDefinition,
    strategy: &'a StrategyConfig,
    cash: Decimal,
    total_injected: Decimal,
    properties: Vec<OwnedProperty>,
    counts: AcquisitionCounts,
    state: SimulationState,

    // Outputs accumulated during the run.
    snapshots: Vec<PortfolioSnapshot>,
    events: Vec<Event>,
}

impl<'a> Simulator<'a> {
    pub fn new(
        investment: &'a InvestmentDefinition,
        strategy: &'a StrategyConfig,
    ) -> Result<Self, SimulationError> {
        validate(investment, strategy)?;

        Ok(Self {
            investment,
            strategy,
            cash: strategy.initial_capital,
            total_injected: Decimal::zero(),
            properties: Vec::new(),
            counts: AcquisitionCounts::default(),
            state: SimulationState::Running,
            snapshots: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn run(mut self, cancel: &CancelFlag) -> Result<SimulationResult, SimulationError> {
        tracing::debug!(
            strategy = self.strategy.kind.as_str(),
            horizon = self.strategy.horizon_months,
            initial_capital = %self.strategy.initial_capital,
            "Starting simulation"
        );

        for month in 1..=self.strategy.horizon_months {
            let period = Period::new(month);
            if cancel.is_cancelled() {
                tracing::debug!(period = %period, "Simulation cancelled");
                return Err(SimulationError::Cancelled { period });
            }

            self.step(period)?;
            if self.state != SimulationState::Running {
                break;
            }
        }

        if self.state == SimulationState::Running {
            self.state = SimulationState::Completed;
        }

        match &self.state {
            SimulationState::TerminatedEarly(reason) => {
                tracing::info!(
                    strategy = self.strategy.kind.as_str(),
                    reason = %reason,
                    "Simulation terminated early"
                );
            }
            _ => {
                tracing::info!(
                    strategy = self.strategy.kind.as_str(),
                    properties = self.properties.len(),
                    cash = %self.cash,
                    "Simulation completed"
                );
            }
        }

        Ok(SimulationResult {
            snapshots: self.snapshots,
            events: self.events,
            state: self.state,
        })
    }

    fn step(&mut self, period: Period) -> Result<(), SimulationError> {
        self.apply_injections(period);

        if let Some(shortfall) = self.accrue_month(period) {
            let snapshot = self.snapshot(period, shortfall);
            self.snapshots.push(snapshot);
            return Ok(());
        }

        let appreciation = self.investment.financing.appreciation_rate;
        let escalation = self.investment.operating.rent_escalation_rate;
        for property in &mut self.properties {
            property.appreciate(appreciation, escalation);
        }

        self.refinance(period)?;
        self.acquire(period)?;

        let terminated = self.state != SimulationState::Running;
        if terminated
            || self
                .strategy
                .tracking
                .is_tracked(period, self.strategy.horizon_months)
        {
            let snapshot = self.snapshot(period, Decimal::zero());
            self.snapshots.push(snapshot);
        }
        Ok(())
    }

    fn apply_injections(&mut self, period: Period) {
        if resolve_all(&self.strategy.injections, period).is_none() {
            return;
        }
        for (rule_index, rule) in self.strategy.injections.iter().enumerate() {
            let Some(amount) = rule.resolve(period) else {
                continue;
            };
            self.cash += amount;
            self.total_injected += amount;
            tracing::debug!(period = %period, amount = %amount, rule_index, "Capital injected");
            self.events.push(Event::Injection(InjectionEvent {
                period,
                rule_index,
                amount,
                frequency: rule.frequency,
                total_injected_to_date: self.total_injected,
            }));
        }
    }

    /// Stage every property's month, then commit it unless cash would go
    /// negative. Returns the shortfall when the month cannot be funded.
    fn accrue_month(&mut self, period: Period) -> Option<Decimal> {
        let operating = &self.investment.operating;
        let rate = self.investment.financing.interest_rate;
        let staged: Vec<MonthAccrual> = self
            .properties
            .iter()
            .map(|p| p.accrue(operating, rate))
            .collect();
        let net: Decimal = staged.iter().map(MonthAccrual::net_cashflow).sum();

        let after = self.cash + net;
        if after.is_negative() {
            let shortfall = -after;
            self.state = SimulationState::TerminatedEarly(EndReason::CashDeficit {
                period,
                shortfall,
                cash_available: self.cash,
            });
            return Some(shortfall);
        }

        for (property, accrual) in self.properties.iter_mut().zip(staged.iter()) {
            property.commit(accrual);
        }
        self.cash = after;
        None
    }

    fn refinance(&mut self, period: Period) -> Result<(), SimulationError> {
        let Some(policy) = self.strategy.refinancing else {
            return Ok(());
        };
        if !policy.is_due(period) {
            return Ok(());
        }

        let financing = &self.investment.financing;
        for property in self.properties.iter_mut().filter(|p| p.kind.is_leveraged()) {
            let new_balance = (property.current_value * policy.target_ltv).round_dp(2);
            let cash_out = new_balance - property.loan_balance;
            if !cash_out.is_positive() || cash_out <= policy.min_cash_out {
                continue;
            }

            let new_payment = monthly_payment(
                new_balance,
                financing.interest_rate,
                financing.loan_term_months,
            )?;
            let old_balance = property.loan_balance;
            property.refinance(new_balance, new_payment);
            self.cash += cash_out;

            tracing::debug!(
                period = %period,
                property_id = %property.id,
                cash_out = %cash_out,
                "Refinanced property"
            );
            self.events.push(Event::Refinance(RefinanceEvent {
                period,
                property_id: property.id,
                property_value: property.current_value,
                old_loan_balance: old_balance,
                new_loan_balance: new_balance,
                cash_extracted: cash_out,
                new_ltv: new_balance.ratio_or_zero(property.current_value),
                new_monthly_payment: new_payment,
            }));
        }
        Ok(())
    }

    /// Price of the next purchase: the average current value of the owned
    /// properties, or the base price before the first one.
    fn market_price(&self) -> Decimal {
        if self.properties.is_empty() {
            return self.investment.acquisition.purchase_price;
        }
        let total: Decimal = self.properties.iter().map(|p| p.current_value).sum();
        total / Decimal::from(self.properties.len())
    }

    /// Starting rent of a new property, averaged the same way.
    fn market_rent(&self) -> Decimal {
        if self.properties.is_empty() {
            return self.investment.operating.monthly_rental_income;
        }
        let total: Decimal = self.properties.iter().map(|p| p.monthly_rent).sum();
        total / Decimal::from(self.properties.len())
    }

    fn next_quote(&self) -> Result<PurchaseQuote, InvalidFinancingError> {
        let kind = next_kind(&self.strategy.kind, &self.counts);
        self.investment.quote_at(kind, self.market_price())
    }

    /// Portfolio net cash flow of next month at current terms.
    fn run_rate_cashflow(&self) -> Decimal {
        let operating = &self.investment.operating;
        let rate = self.investment.financing.interest_rate;
        self.properties
            .iter()
            .map(|p| p.accrue(operating, rate).net_cashflow())
            .sum()
    }

    /// True when the portfolio burns cash and the cash left covers fewer
    /// than `cash_reserve_months` months of it.
    fn below_cash_reserve(&self) -> bool {
        let months = self.strategy.cash_reserve_months;
        if months == 0 {
            return false;
        }
        let burn = -self.run_rate_cashflow();
        burn.is_positive() && self.cash < burn * Decimal::from(months)
    }

    fn acquire(&mut self, period: Period) -> Result<(), SimulationError> {
        let first_period = period.as_u32() == 1;
        if !first_period && !self.strategy.reinvest_cashflow {
            return Ok(());
        }

        loop {
            let quote = self.next_quote()?;
            if self.cash < quote.cash_required {
                break;
            }
            self.purchase(period, &quote);
            if !self.strategy.reinvest_cashflow {
                break;
            }
            if self.below_cash_reserve() {
                tracing::debug!(
                    period = %period,
                    cash = %self.cash,
                    reserve_months = self.strategy.cash_reserve_months,
                    "Stopped buying to keep a cash reserve"
                );
                break;
            }
        }

        let no_future_capital =
            !self.strategy.reinvest_cashflow || self.strategy.injections.is_empty();
        if first_period && self.properties.is_empty() && no_future_capital {
            let required = self.next_quote()?.cash_required;
            self.state = SimulationState::TerminatedEarly(EndReason::InsufficientCapital {
                required,
                available: self.cash,
            });
        }
        Ok(())
    }

    fn purchase(&mut self, period: Period, quote: &PurchaseQuote) {
        let id = PropertyId::new(self.properties.len() as u32);
        let rent = self.market_rent();
        self.cash -= quote.cash_required;
        self.counts.record(quote.kind);
        self.properties.push(OwnedProperty::acquire(id, period, quote, rent));

        tracing::debug!(
            period = %period,
            property_id = %id,
            kind = quote.kind.as_str(),
            purchase_price = %quote.purchase_price,
            cash_required = %quote.cash_required,
            "Purchased property"
        );
        self.events.push(Event::Purchase(PurchaseEvent {
            period,
            property_id: id,
            kind: quote.kind,
            purchase_price: quote.purchase_price,
            loan_amount: quote.loan_amount,
            cash_required: quote.cash_required,
            monthly_payment: quote.monthly_payment,
            cash_after: self.cash,
        }));
    }

    fn snapshot(&self, period: Period, cash_shortfall: Decimal) -> PortfolioSnapshot {
        let operating = &self.investment.operating;
        let rate = self.investment.financing.interest_rate;

        let (properties, inputs): (Vec<_>, Vec<_>) = self
            .properties
            .iter()
            .map(|p| p.report(operating, rate))
            .unzip();

        let total_property_value: Decimal = properties.iter().map(|p| p.current_value).sum();
        let total_debt: Decimal = properties.iter().map(|p| p.loan_balance).sum();
        let total_equity = total_property_value - total_debt;
        let monthly_cashflow: Decimal = properties.iter().map(|p| p.monthly_cashflow).sum();
        let total_cash_invested: Decimal = properties.iter().map(|p| p.cash_invested).sum();

        PortfolioSnapshot {
            period,
            total_property_value,
            total_debt,
            total_equity,
            monthly_cashflow,
            annual_cashflow: monthly_cashflow * Decimal::twelve(),
            cash_available: self.cash,
            property_count: properties.len(),
            total_cash_invested,
            total_capital_injected: self.total_injected,
            net_worth: total_equity + self.cash,
            cash_shortfall,
            yields: portfolio_yields(&inputs),
            properties,
            simulation_ended: self.state != SimulationState::Running,
            end_reason: self.state.end_reason().cloned(),
        }
    }
}
