use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Vault token metadata and total value locked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    /// Accountant rate, base asset per share
    pub rate: U256,
    pub rate_decimals: u8,
    /// TVL in the base asset
    pub tvl_native: f64,
    pub spot_price: f64,
    /// TVL in the price feed's currency
    pub tvl_quote: f64,
}
