// src/error.rs
use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("insufficient balance of {asset} for {account}: have {balance}, need {required}")]
    InsufficientBalance {
        asset: Address,
        account: Address,
        balance: U256,
        required: U256,
    },

    #[error("insufficient shares for {account}: have {balance}, need {required}")]
    InsufficientShares {
        account: Address,
        balance: U256,
        required: U256,
    },

    #[error("{account} is not authorized to call {selector} on {target}; request the role from the vault operator")]
    NotAuthorized {
        account: Address,
        target: Address,
        selector: String,
    },

    #[error("approval of {amount} {token} for {spender} was rejected: {reason}")]
    ApprovalRejected {
        token: Address,
        spender: Address,
        amount: U256,
        reason: String,
    },

    #[error("transaction {hash} reverted{}", revert_suffix(.reason))]
    TransactionReverted { hash: B256, reason: Option<String> },

    #[error("transaction {hash} not confirmed after {waited_secs}s")]
    ConfirmationTimeout { hash: B256, waited_secs: u64 },

    #[error("block {block} not found")]
    BlockNotFound { block: u64 },

    #[error("historical state of {contract} at block {block} is unavailable: {message}")]
    HistoricalStateUnavailable {
        contract: Address,
        block: u64,
        message: String,
    },

    #[error("quote rate for {asset} is zero")]
    ZeroQuoteRate { asset: Address },

    #[error("price feed unavailable: {0}")]
    PriceFeedUnavailable(String),

    #[error("no signer configured; deposits and withdrawals are disabled")]
    SignerUnavailable,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
}

fn revert_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default()
}

impl VaultError {
    pub fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        VaultError::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn decode(what: &str, message: impl ToString) -> Self {
        VaultError::Decode {
            what: what.to_string(),
            message: message.to_string(),
        }
    }
}
