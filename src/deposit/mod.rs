// src/deposit/mod.rs
//! Deposits through the vault's teller

mod composer;
mod types;

pub use composer::DepositComposer;
pub use types::*;
