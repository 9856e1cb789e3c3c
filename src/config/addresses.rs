// src/config/addresses.rs
//! Mainnet deployment of the vault and its satellite contracts

use alloy_primitives::{address, Address};

pub const VAULT_ADDRESS: Address = address!("5401b8620E5FB570064CA9114fd1e135fd77D57c");
pub const ACCOUNTANT_ADDRESS: Address = address!("28634D0c5edC67CF2450E74deA49B90a4FF93dCE");
pub const TELLER_ADDRESS: Address = address!("4e8f5128f473c6948127f9cbca474a6700f99bab");
pub const ATOMIC_QUEUE_ADDRESS: Address = address!("3b4acd8879fb60586ccd74bc2f831a4c5e7dbbf8");
pub const LBTC_RATE_PROVIDER: Address = address!("94916a66fC119a0AC7d612927F0D909cAc15314C");
pub const ROLES_AUTHORITY_ADDRESS: Address = address!("f3e03ef7df97511a52f31ea7a22329619db2bdf4");

/// WBTC
pub const DEFAULT_DEPOSIT_ASSET: Address = address!("2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");
/// LBTC
pub const DEFAULT_WITHDRAW_ASSET: Address = address!("8236a87084f8B84306f72007F36F2618A5634494");

/// All contracts the client talks to, grouped so tests can point them elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultContracts {
    pub vault: Address,
    pub accountant: Address,
    pub teller: Address,
    pub atomic_queue: Address,
    pub lbtc_rate_provider: Address,
    pub roles_authority: Address,
}

impl Default for VaultContracts {
    fn default() -> Self {
        Self {
            vault: VAULT_ADDRESS,
            accountant: ACCOUNTANT_ADDRESS,
            teller: TELLER_ADDRESS,
            atomic_queue: ATOMIC_QUEUE_ADDRESS,
            lbtc_rate_provider: LBTC_RATE_PROVIDER,
            roles_authority: ROLES_AUTHORITY_ADDRESS,
        }
    }
}
