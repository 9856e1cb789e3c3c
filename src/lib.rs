//! Yield reporting and deposit/withdrawal settlement for a tokenized BTC vault

pub mod allowance;
pub mod amount;
pub mod apy;
pub mod authorization;
pub mod chain;
pub mod config;
pub mod context;
pub mod deposit;
pub mod display;
pub mod error;
pub mod oracle;
pub mod report;
pub mod withdrawal;

#[cfg(test)]
pub mod testing;

pub use context::ClientContext;
pub use error::{Result, VaultError};
