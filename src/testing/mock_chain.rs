use alloy_primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::chain::rpc::poll_receipt;
use crate::chain::{BlockTag, ChainReader, TransactionSubmitter, TxReceipt};
use crate::config::ConfirmationConfig;
use crate::error::{Result, VaultError};
use crate::withdrawal::WithdrawalRequest;

/// Seconds between blocks when timestamps are derived from the head
pub const BLOCK_TIME_SECS: u64 = 12;

/// A state-changing call the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedTx {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Deposit {
        teller: Address,
        asset: Address,
        amount: U256,
        minimum_mint: U256,
    },
    AtomicRequest {
        queue: Address,
        request: WithdrawalRequest,
    },
}

#[derive(Default)]
struct MockState {
    head_block: u64,
    head_timestamp: u64,
    rates: HashMap<Address, BTreeMap<u64, U256>>,
    pruned_before: Option<u64>,
    pruned_sources: HashMap<Address, u64>,
    quote_rates: HashMap<Address, U256>,
    decimals: HashMap<Address, u8>,
    names: HashMap<Address, String>,
    symbols: HashMap<Address, String>,
    total_supplies: HashMap<Address, U256>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    authorized: HashSet<(Address, Address, [u8; 4])>,
    revert_approvals: bool,
    revert_writes: bool,
    unmined: bool,
    transactions: Vec<RecordedTx>,
    receipts: HashMap<TxHash, TxReceipt>,
}

/// In-memory chain implementing both chain traits, recording every write
pub struct MockChain {
    sender: Address,
    state: Mutex<MockState>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        MockChain {
            sender: Address::repeat_byte(0x5e),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_head(self, block: u64, timestamp: u64) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.head_block = block;
            state.head_timestamp = timestamp;
        }
        self
    }

    pub fn sender_address(&self) -> Address {
        self.sender
    }

    /// Rate reads at `block` or later return `rate` until a newer entry
    pub fn set_rate(&self, source: Address, block: u64, rate: U256) {
        self.state
            .lock()
            .unwrap()
            .rates
            .entry(source)
            .or_default()
            .insert(block, rate);
    }

    /// Behave like a non-archive node that dropped state before `block`
    pub fn prune_before(&self, block: u64) {
        self.state.lock().unwrap().pruned_before = Some(block);
    }

    pub fn prune_source_before(&self, source: Address, block: u64) {
        self.state.lock().unwrap().pruned_sources.insert(source, block);
    }

    pub fn set_rate_in_quote(&self, quote: Address, rate: U256) {
        self.state.lock().unwrap().quote_rates.insert(quote, rate);
    }

    pub fn set_decimals(&self, contract: Address, decimals: u8) {
        self.state.lock().unwrap().decimals.insert(contract, decimals);
    }

    pub fn set_token_metadata(&self, token: Address, name: &str, symbol: &str, total_supply: U256) {
        let mut state = self.state.lock().unwrap();
        state.names.insert(token, name.to_string());
        state.symbols.insert(token, symbol.to_string());
        state.total_supplies.insert(token, total_supply);
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.state.lock().unwrap().balances.insert((token, owner), amount);
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn authorize(&self, user: Address, target: Address, selector: [u8; 4]) {
        self.state.lock().unwrap().authorized.insert((user, target, selector));
    }

    pub fn revert_approvals(&self) {
        self.state.lock().unwrap().revert_approvals = true;
    }

    /// Make deposits and withdrawal requests revert
    pub fn revert_writes(&self) {
        self.state.lock().unwrap().revert_writes = true;
    }

    /// Accept transactions but never mine them
    pub fn leave_unmined(&self) {
        self.state.lock().unwrap().unmined = true;
    }

    pub fn transactions(&self) -> Vec<RecordedTx> {
        self.state.lock().unwrap().transactions.clone()
    }

    pub fn approvals(&self) -> usize {
        self.transactions()
            .iter()
            .filter(|tx| matches!(tx, RecordedTx::Approve { .. }))
            .count()
    }

    fn record(&self, tx: RecordedTx, success: bool) -> TxHash {
        let mut state = self.state.lock().unwrap();
        state.transactions.push(tx);

        let nonce = state.transactions.len() as u64;
        let hash = B256::left_padding_from(&nonce.to_be_bytes());
        let receipt = TxReceipt {
            hash,
            block_number: state.head_block + nonce,
            gas_used: 50_000 + nonce,
            success,
        };
        state.receipts.insert(hash, receipt);
        hash
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn block_number(&self) -> Result<u64> {
        Ok(self.state.lock().unwrap().head_block)
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64> {
        let state = self.state.lock().unwrap();
        if block > state.head_block {
            return Err(VaultError::BlockNotFound { block });
        }
        Ok(state
            .head_timestamp
            .saturating_sub((state.head_block - block) * BLOCK_TIME_SECS))
    }

    async fn rate(&self, source: Address, block: BlockTag) -> Result<U256> {
        let state = self.state.lock().unwrap();
        let block = match block {
            BlockTag::Latest => state.head_block,
            BlockTag::Number(n) => n,
        };

        if block > state.head_block {
            return Err(VaultError::BlockNotFound { block });
        }

        let pruned = state
            .pruned_before
            .into_iter()
            .chain(state.pruned_sources.get(&source).copied())
            .any(|cutoff| block < cutoff);
        if pruned {
            return Err(VaultError::HistoricalStateUnavailable {
                contract: source,
                block,
                message: "missing trie node".to_string(),
            });
        }

        state
            .rates
            .get(&source)
            .and_then(|history| history.range(..=block).next_back())
            .map(|(_, rate)| *rate)
            .ok_or_else(|| VaultError::Rpc("execution reverted".to_string()))
    }

    async fn rate_in_quote(&self, _accountant: Address, quote: Address) -> Result<U256> {
        self.state
            .lock()
            .unwrap()
            .quote_rates
            .get(&quote)
            .copied()
            .ok_or_else(|| VaultError::Rpc("execution reverted: unsupported quote".to_string()))
    }

    async fn decimals(&self, contract: Address) -> Result<u8> {
        Ok(self.state.lock().unwrap().decimals.get(&contract).copied().unwrap_or(18))
    }

    async fn name(&self, token: Address) -> Result<String> {
        Ok(self.state.lock().unwrap().names.get(&token).cloned().unwrap_or_default())
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        Ok(self.state.lock().unwrap().symbols.get(&token).cloned().unwrap_or_default())
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        Ok(self.state.lock().unwrap().total_supplies.get(&token).copied().unwrap_or_default())
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        Ok(self.state.lock().unwrap().balances.get(&(token, owner)).copied().unwrap_or_default())
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn can_call(
        &self,
        _authority: Address,
        user: Address,
        target: Address,
        selector: [u8; 4],
    ) -> Result<bool> {
        Ok(self.state.lock().unwrap().authorized.contains(&(user, target, selector)))
    }
}

#[async_trait]
impl TransactionSubmitter for MockChain {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let success = !self.state.lock().unwrap().revert_approvals;
        if success {
            self.set_allowance(token, self.sender, spender, amount);
        }
        Ok(self.record(RecordedTx::Approve { token, spender, amount }, success))
    }

    async fn deposit(
        &self,
        teller: Address,
        asset: Address,
        amount: U256,
        minimum_mint: U256,
    ) -> Result<TxHash> {
        let success = !self.state.lock().unwrap().revert_writes;
        let tx = RecordedTx::Deposit {
            teller,
            asset,
            amount,
            minimum_mint,
        };
        Ok(self.record(tx, success))
    }

    async fn update_atomic_request(
        &self,
        queue: Address,
        request: &WithdrawalRequest,
    ) -> Result<TxHash> {
        let success = !self.state.lock().unwrap().revert_writes;
        let tx = RecordedTx::AtomicRequest {
            queue,
            request: request.clone(),
        };
        Ok(self.record(tx, success))
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt> {
        let unmined = self.state.lock().unwrap().unmined;
        if unmined {
            let confirmation = ConfirmationConfig {
                poll_interval: Duration::from_millis(1),
                timeout: Some(Duration::ZERO),
            };
            return poll_receipt(hash, &confirmation, || async { Ok::<_, VaultError>(None) }).await;
        }

        self.state
            .lock()
            .unwrap()
            .receipts
            .get(&hash)
            .cloned()
            .ok_or_else(|| VaultError::Rpc(format!("unknown transaction {}", hash)))
    }
}
