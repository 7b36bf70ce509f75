//! Pure computation engine for portfolio simulation.

pub mod acquisition;
pub mod finance;
pub mod property;
pub mod simulator;
pub mod yields;

pub use acquisition::{next_kind, AcquisitionCounts};
pub use finance::{
    compound_monthly, monthly_payment, monthly_rate, split_payment, InvalidFinancingError,
    PaymentSplit,
};
pub use property::{MonthAccrual, OwnedProperty};
pub use simulator::{
    simulate, simulate_with_cancel, CancelFlag, SimulationError, SimulationResult,
    SimulationState, Simulator,
};
pub use yields::{portfolio_yields, property_yields, YieldInputs};
