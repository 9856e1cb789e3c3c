pub mod addresses;

use alloy_primitives::Address;
use std::str::FromStr;
use std::time::Duration;

use crate::deposit::MinimumSharesPolicy;
use crate::error::{Result, VaultError};
pub use addresses::VaultContracts;

/// Ethereum mainnet produces a block every 12 seconds
pub const BLOCKS_PER_DAY: u64 = 7200;
/// Lookback window used for the headline APY
pub const APY_LOOKBACK_DAYS: u64 = 30;
/// `deposit(address,uint256,uint256)` on the teller
pub const DEPOSIT_SELECTOR: [u8; 4] = [0x0e, 0xfe, 0x6a, 0x8b];
/// Vault shares carry 8 decimals
pub const SHARE_DECIMALS: u8 = 8;
/// Premium applied to the informational share estimate
pub const SHARE_PREMIUM_BPS: u64 = 25;
/// Discount offered to solvers on atomic withdrawal requests
pub const WITHDRAW_DISCOUNT_BPS: u64 = 100;

const DEFAULT_PRICE_FEED_PATH: &str = "bitcoin.usd";
const DEFAULT_WITHDRAW_DEADLINE_DAYS: u64 = 3;
const DEFAULT_CONFIRMATION_POLL_MS: u64 = 2000;

/// How long to wait for a submitted transaction to be mined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationConfig {
    pub poll_interval: Duration,
    /// `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_CONFIRMATION_POLL_MS),
            timeout: None,
        }
    }
}

/// Everything the client needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub price_feed_url: String,
    /// Path of the numeric price field inside the feed's JSON object
    pub price_feed_path: Vec<String>,
    /// Account transactions are sent from; `None` disables deposit and withdrawal
    pub signer: Option<Address>,
    pub contracts: VaultContracts,
    pub deposit_asset: Address,
    pub withdraw_asset: Address,
    pub withdraw_deadline_days: u64,
    pub minimum_shares: MinimumSharesPolicy,
    pub confirmation: ConfirmationConfig,
    pub blocks_per_day: u64,
    pub lookback_days: u64,
    pub deposit_amount: Option<String>,
    pub withdraw_amount: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values behave like unset ones, the way a blank line in a .env file does
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = get("RPC_URL")
            .ok_or_else(|| VaultError::Config("RPC_URL is not set".to_string()))?;

        let signer = get("SIGNER_ADDRESS")
            .map(|v| parse_address("SIGNER_ADDRESS", &v))
            .transpose()?;

        let deposit_asset = match get("DEPOSIT_ASSET") {
            Some(v) => parse_address("DEPOSIT_ASSET", &v)?,
            None => addresses::DEFAULT_DEPOSIT_ASSET,
        };
        let withdraw_asset = match get("WITHDRAW_ASSET") {
            Some(v) => parse_address("WITHDRAW_ASSET", &v)?,
            None => addresses::DEFAULT_WITHDRAW_ASSET,
        };

        let withdraw_deadline_days = get("WITHDRAW_DEADLINE_DAYS")
            .map(|v| parse_number("WITHDRAW_DEADLINE_DAYS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_WITHDRAW_DEADLINE_DAYS);

        let enforce_min_shares = get("ENFORCE_MIN_SHARES")
            .map(|v| parse_flag("ENFORCE_MIN_SHARES", &v))
            .transpose()?
            .unwrap_or(false);
        let minimum_shares = if enforce_min_shares {
            MinimumSharesPolicy::EnforceExpected
        } else {
            MinimumSharesPolicy::Disabled
        };

        let poll_ms = get("CONFIRMATION_POLL_MS")
            .map(|v| parse_number("CONFIRMATION_POLL_MS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_CONFIRMATION_POLL_MS);
        let timeout = get("CONFIRMATION_TIMEOUT_SECS")
            .map(|v| parse_number("CONFIRMATION_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        let price_feed_path = get("PRICE_FEED_PATH")
            .unwrap_or_else(|| DEFAULT_PRICE_FEED_PATH.to_string())
            .split('.')
            .map(str::to_string)
            .collect();

        Ok(Self {
            rpc_url,
            price_feed_url: get("BTC_PRICE_URL").unwrap_or_default(),
            price_feed_path,
            signer,
            contracts: VaultContracts::default(),
            deposit_asset,
            withdraw_asset,
            withdraw_deadline_days,
            minimum_shares,
            confirmation: ConfirmationConfig {
                poll_interval: Duration::from_millis(poll_ms),
                timeout,
            },
            blocks_per_day: BLOCKS_PER_DAY,
            lookback_days: APY_LOOKBACK_DAYS,
            deposit_amount: get("DEPOSIT_AMOUNT"),
            withdraw_amount: get("WITHDRAW_AMOUNT"),
        })
    }
}

fn parse_address(key: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| VaultError::Config(format!("{} is not a valid address: {}", key, e)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(VaultError::Config(format!(
            "{} must be true, false, 1 or 0, got {:?}",
            key, other
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| VaultError::Config(format!("{} must be a non-negative integer: {}", key, e)))
}
