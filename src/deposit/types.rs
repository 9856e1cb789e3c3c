//! Type definitions for deposits through the teller

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::chain::TxReceipt;

/// One vault share in base units (8 decimals)
pub const ONE_SHARE: U256 = U256::from_limbs([100_000_000, 0, 0, 0]);

const BPS_DENOMINATOR: u64 = 10_000;

/// What to pass as the teller's `minimumMint`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinimumSharesPolicy {
    /// Accept any number of shares (`minimumMint = 0`)
    #[default]
    Disabled,
    /// Require at least the premium-adjusted share estimate
    EnforceExpected,
}

impl MinimumSharesPolicy {
    pub fn minimum_mint(&self, expected_shares: U256) -> U256 {
        match self {
            MinimumSharesPolicy::Disabled => U256::ZERO,
            MinimumSharesPolicy::EnforceExpected => expected_shares,
        }
    }
}

/// A validated request to deposit `amount` of `asset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositIntent {
    pub asset: Address,
    /// Base units of the asset
    pub amount: U256,
    pub depositor: Address,
}

/// Result of a confirmed deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositOutcome {
    pub intent: DepositIntent,
    pub quote_rate: U256,
    pub expected_shares: U256,
    pub minimum_mint: U256,
    /// Present when the allowance had to be raised first
    pub approval: Option<TxReceipt>,
    pub receipt: TxReceipt,
}

/// `x * y / denominator`, rounded down; `None` on overflow or zero denominator
pub fn mul_div_down(x: U256, y: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    x.checked_mul(y).map(|product| product / denominator)
}

/// Shares a deposit should mint at `quote_rate`, less the premium
pub fn expected_shares(amount: U256, quote_rate: U256, premium_bps: u64) -> Option<U256> {
    let raw = mul_div_down(amount, ONE_SHARE, quote_rate)?;
    let keep = BPS_DENOMINATOR.checked_sub(premium_bps)?;
    mul_div_down(raw, U256::from(keep), U256::from(BPS_DENOMINATOR))
}
