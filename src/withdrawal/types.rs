//! Type definitions for atomic withdrawal requests

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::apy::SECONDS_PER_DAY;
use crate::chain::TxReceipt;

/// Request placed on the atomic queue; the queue owns it once submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Vault share token being offered
    pub offer_token: Address,
    /// Asset wanted in return
    pub want_token: Address,
    /// Epoch seconds after which solvers may no longer fill the request
    pub deadline: u64,
    /// Share units (8 decimals), must fit in uint96
    pub offer_amount: U256,
    /// 0 prices the request at the accountant's rate
    pub atomic_price: u64,
    pub in_solve: bool,
    pub accountant: Address,
    pub discount_bps: u64,
}

/// Deadline `days` whole days after `now`
pub fn deadline_after(now: u64, days: u64) -> u64 {
    now.saturating_add(days.saturating_mul(SECONDS_PER_DAY))
}

/// Result of a confirmed withdrawal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalOutcome {
    pub request: WithdrawalRequest,
    /// Present when the queue's allowance had to be raised first
    pub approval: Option<TxReceipt>,
    pub receipt: TxReceipt,
}
