//! Stable fingerprint of a run's inputs, for caching and deduplication.

use sha2::{Digest, Sha256};

use crate::domain::{InvestmentDefinition, StrategyConfig};

/// SHA-256 over the JSON encoding of the investment and strategy.
///
/// Struct field order is fixed, so equal inputs always hash equally.
pub fn run_fingerprint(
    investment: &InvestmentDefinition,
    strategy: &StrategyConfig,
) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(investment)?);
    hasher.update(b"|");
    hasher.update(serde_json::to_vec(strategy)?);
    let hash = hasher.finalize();
    Ok(format!("run:{}", hex::encode(&hash[..16])))
}
