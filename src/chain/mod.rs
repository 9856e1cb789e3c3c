//! Chain access seams
//!
//! `ChainReader` covers the view calls the client makes, `TransactionSubmitter`
//! the state-changing ones. Contract-call marshalling lives behind these traits
//! so the composers only deal in addresses and amounts.

pub mod contracts;
pub mod rpc;
mod types;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::error::Result;
use crate::withdrawal::WithdrawalRequest;

pub use rpc::{RpcChainClient, RpcTransactionSubmitter};
pub use types::*;

/// Read-only view calls against the chain
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current head block number
    async fn block_number(&self) -> Result<u64>;

    /// Timestamp of a block, `BlockNotFound` if it does not exist
    async fn block_timestamp(&self, block: u64) -> Result<u64>;

    /// `getRate()` on an accountant or rate provider
    async fn rate(&self, source: Address, block: BlockTag) -> Result<U256>;

    /// `getRateInQuoteSafe(quote)` on the accountant
    async fn rate_in_quote(&self, accountant: Address, quote: Address) -> Result<U256>;

    /// `decimals()` on a token or accountant
    async fn decimals(&self, contract: Address) -> Result<u8>;

    async fn name(&self, token: Address) -> Result<String>;

    async fn symbol(&self, token: Address) -> Result<String>;

    async fn total_supply(&self, token: Address) -> Result<U256>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// `canCall(user, target, selector)` on the roles authority
    async fn can_call(
        &self,
        authority: Address,
        user: Address,
        target: Address,
        selector: [u8; 4],
    ) -> Result<bool>;
}

/// State-changing calls sent from a single account
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Account every transaction is sent from
    fn sender(&self) -> Address;

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    /// `deposit(asset, amount, minimumMint)` on the teller
    async fn deposit(
        &self,
        teller: Address,
        asset: Address,
        amount: U256,
        minimum_mint: U256,
    ) -> Result<TxHash>;

    /// `safeUpdateAtomicRequest` on the atomic queue
    async fn update_atomic_request(
        &self,
        queue: Address,
        request: &WithdrawalRequest,
    ) -> Result<TxHash>;

    /// Block until the transaction is mined; reverted transactions still return a receipt
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt>;
}
