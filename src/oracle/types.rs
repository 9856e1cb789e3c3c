use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A contract exposing `getRate()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSource {
    pub id: String,
    pub address: Address,
    /// Fixed-point scale of the rate
    pub decimals: u8,
}

impl RateSource {
    pub fn new(id: &str, address: Address, decimals: u8) -> Self {
        Self {
            id: id.to_string(),
            address,
            decimals,
        }
    }
}

/// A rate read at a specific block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSample {
    pub source: String,
    pub rate: U256,
    pub block: u64,
    /// Seconds since the epoch
    pub timestamp: u64,
}
