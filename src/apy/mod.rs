//! Yield computation from rate snapshots

mod calculator;
mod types;

pub use calculator::{compute_window_yield, YieldCalculator};
pub use types::*;

use crate::config::VaultContracts;
use crate::oracle::RateSource;

/// Rate curves the vault's return is made of: the strategy's accountant rate
/// and the LBTC staking rate underneath it
pub fn default_sources(contracts: &VaultContracts) -> Vec<RateSource> {
    vec![
        RateSource::new("strategy", contracts.accountant, 8),
        RateSource::new("lbtc", contracts.lbtc_rate_provider, 18),
    ]
}
