//! Domain primitives: Period, PropertyId, FinancingKind.

use serde::{Deserialize, Serialize};

/// One-based simulation month index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period(pub u32);

impl Period {
    /// Create a Period from a month number.
    pub fn new(month: u32) -> Self {
        Period(month)
    }

    /// Get the underlying month number.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// True on every multiple of `interval_months` (never for interval 0).
    pub fn is_multiple_of(&self, interval_months: u32) -> bool {
        interval_months != 0 && self.0 % interval_months == 0
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential property identifier. Assignment order equals acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u32);

impl PropertyId {
    pub fn new(id: u32) -> Self {
        PropertyId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Arena index of this property.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a property is paid for. Fixed at acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingKind {
    /// Paid in full, no loan.
    Cash,
    /// Partly financed by a bond sized by the LTV ratio.
    Leveraged,
}

impl FinancingKind {
    pub fn is_leveraged(&self) -> bool {
        matches!(self, FinancingKind::Leveraged)
    }

    /// Get the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancingKind::Cash => "cash",
            FinancingKind::Leveraged => "leveraged",
        }
    }
}

impl std::fmt::Display for FinancingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
