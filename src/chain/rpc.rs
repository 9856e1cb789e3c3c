// src/chain/rpc.rs
use alloy_primitives::{Address, FixedBytes, TxHash, Uint, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::future::Future;
use std::str::FromStr;
use std::time::Instant;

use super::contracts;
use super::{BlockTag, ChainReader, TransactionSubmitter, TxReceipt};
use crate::config::ConfirmationConfig;
use crate::error::{Result, VaultError};
use crate::withdrawal::WithdrawalRequest;

/// Node messages for state that has been pruned from a non-archive node
const PRUNED_STATE_MARKERS: &[&str] = &[
    "missing trie node",
    "historical state",
    "state is not available",
    "state histories haven't been fully indexed",
    "pruned",
];

/// Node messages for a block the node does not know
const UNKNOWN_BLOCK_MARKERS: &[&str] = &["header not found", "unknown block", "block not found"];

/// JSON-RPC client for view calls
#[derive(Clone)]
pub struct RpcChainClient {
    client: Client,
    rpc_url: String,
}

impl RpcChainClient {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.to_string(),
        }
    }

    /// Send a JSON-RPC request and return its `result` field
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VaultError::Rpc(format!("{} returned HTTP {}", method, response.status())));
        }

        let mut json: Value = response.json().await?;

        if let Some(error) = json.get("error") {
            let message = error["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(VaultError::Rpc(message));
        }

        Ok(json.get_mut("result").map(Value::take).unwrap_or(Value::Null))
    }

    /// `eth_call` returning the raw return data
    async fn eth_call(&self, to: Address, data: Vec<u8>, block: BlockTag) -> Result<Vec<u8>> {
        let params = json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            block.to_rpc_param(),
        ]);

        let result = match self.request("eth_call", params).await {
            Ok(result) => result,
            Err(VaultError::Rpc(message)) => {
                return Err(match block {
                    BlockTag::Number(number) => classify_call_error(message, to, number),
                    BlockTag::Latest => VaultError::Rpc(message),
                })
            }
            Err(e) => return Err(e),
        };

        let data = result
            .as_str()
            .ok_or_else(|| VaultError::decode("eth_call result", &result))?;
        hex::decode(data.trim_start_matches("0x"))
            .map_err(|e| VaultError::decode("eth_call result", e))
    }

    /// Typed view call
    async fn call<C: SolCall + Send>(
        &self,
        to: Address,
        call: C,
        block: BlockTag,
    ) -> Result<C::Return> {
        let data = self.eth_call(to, call.abi_encode(), block).await?;
        Ok(C::abi_decode_returns(&data, true)?)
    }

    async fn get_transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>> {
        let result = self
            .request("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;

        if result.is_null() {
            return Ok(None);
        }
        parse_receipt(hash, &result).map(Some)
    }
}

#[async_trait]
impl ChainReader for RpcChainClient {
    async fn block_number(&self) -> Result<u64> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&result, "eth_blockNumber")
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64> {
        let params = json!([BlockTag::Number(block).to_rpc_param(), false]);
        let result = match self.request("eth_getBlockByNumber", params).await {
            Ok(result) => result,
            Err(VaultError::Rpc(message)) if matches_any(&message, UNKNOWN_BLOCK_MARKERS) => {
                return Err(VaultError::BlockNotFound { block })
            }
            Err(e) => return Err(e),
        };

        if result.is_null() {
            return Err(VaultError::BlockNotFound { block });
        }
        parse_quantity(&result["timestamp"], "block timestamp")
    }

    async fn rate(&self, source: Address, block: BlockTag) -> Result<U256> {
        Ok(self.call(source, contracts::getRateCall {}, block).await?._0)
    }

    async fn rate_in_quote(&self, accountant: Address, quote: Address) -> Result<U256> {
        let call = contracts::getRateInQuoteSafeCall { quote };
        Ok(self.call(accountant, call, BlockTag::Latest).await?._0)
    }

    async fn decimals(&self, contract: Address) -> Result<u8> {
        Ok(self.call(contract, contracts::decimalsCall {}, BlockTag::Latest).await?._0)
    }

    async fn name(&self, token: Address) -> Result<String> {
        Ok(self.call(token, contracts::nameCall {}, BlockTag::Latest).await?._0)
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        Ok(self.call(token, contracts::symbolCall {}, BlockTag::Latest).await?._0)
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        Ok(self.call(token, contracts::totalSupplyCall {}, BlockTag::Latest).await?._0)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let call = contracts::balanceOfCall { owner };
        Ok(self.call(token, call, BlockTag::Latest).await?._0)
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let call = contracts::allowanceCall { owner, spender };
        Ok(self.call(token, call, BlockTag::Latest).await?._0)
    }

    async fn can_call(
        &self,
        authority: Address,
        user: Address,
        target: Address,
        selector: [u8; 4],
    ) -> Result<bool> {
        let call = contracts::canCallCall {
            user,
            target,
            functionSig: FixedBytes::from(selector),
        };
        Ok(self.call(authority, call, BlockTag::Latest).await?._0)
    }
}

/// Sends transactions through `eth_sendTransaction` for an account the node
/// (or a signing proxy in front of it) holds the key for
pub struct RpcTransactionSubmitter {
    client: RpcChainClient,
    from: Address,
    confirmation: ConfirmationConfig,
}

impl RpcTransactionSubmitter {
    pub fn new(client: RpcChainClient, from: Address, confirmation: ConfirmationConfig) -> Self {
        Self {
            client,
            from,
            confirmation,
        }
    }

    async fn send<C: SolCall + Send>(&self, to: Address, call: C) -> Result<TxHash> {
        let params = json!([{
            "from": self.from.to_string(),
            "to": to.to_string(),
            "data": format!("0x{}", hex::encode(call.abi_encode())),
        }]);

        let result = self.client.request("eth_sendTransaction", params).await?;
        let hash = result
            .as_str()
            .ok_or_else(|| VaultError::decode("transaction hash", &result))?;
        TxHash::from_str(hash).map_err(|e| VaultError::decode("transaction hash", e))
    }
}

#[async_trait]
impl TransactionSubmitter for RpcTransactionSubmitter {
    fn sender(&self) -> Address {
        self.from
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        self.send(token, contracts::approveCall { spender, amount }).await
    }

    async fn deposit(
        &self,
        teller: Address,
        asset: Address,
        amount: U256,
        minimum_mint: U256,
    ) -> Result<TxHash> {
        let call = contracts::depositCall {
            depositAsset: asset,
            depositAmount: amount,
            minimumMint: minimum_mint,
        };
        self.send(teller, call).await
    }

    async fn update_atomic_request(
        &self,
        queue: Address,
        request: &WithdrawalRequest,
    ) -> Result<TxHash> {
        if request.offer_amount.bit_len() > 96 {
            return Err(VaultError::invalid_amount(
                &request.offer_amount.to_string(),
                "offer amount does not fit in uint96",
            ));
        }

        let call = contracts::safeUpdateAtomicRequestCall {
            offer: request.offer_token,
            want: request.want_token,
            userRequest: contracts::AtomicUserRequest {
                deadline: request.deadline,
                atomicPrice: Uint::<88, 2>::from(request.atomic_price),
                offerAmount: Uint::<96, 2>::from(request.offer_amount),
                inSolve: request.in_solve,
            },
            accountant: request.accountant,
            discount: U256::from(request.discount_bps),
        };
        self.send(queue, call).await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt> {
        let client = &self.client;
        poll_receipt(hash, &self.confirmation, move || client.get_transaction_receipt(hash)).await
    }
}

/// Call `fetch` every poll interval until it yields a receipt.
///
/// Gives up with `ConfirmationTimeout` once the configured timeout has passed;
/// without a timeout it waits indefinitely.
pub async fn poll_receipt<F, Fut>(
    hash: TxHash,
    confirmation: &ConfirmationConfig,
    mut fetch: F,
) -> Result<TxReceipt>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<TxReceipt>>>,
{
    let started = Instant::now();
    loop {
        if let Some(receipt) = fetch().await? {
            return Ok(receipt);
        }

        if let Some(timeout) = confirmation.timeout {
            if started.elapsed() >= timeout {
                return Err(VaultError::ConfirmationTimeout {
                    hash,
                    waited_secs: started.elapsed().as_secs(),
                });
            }
        }

        log::debug!("[Rpc] {} not mined yet", hash);
        tokio::time::sleep(confirmation.poll_interval).await;
    }
}

/// Decode an `eth_getTransactionReceipt` result; `status` 1 means success
fn parse_receipt(hash: TxHash, receipt: &Value) -> Result<TxReceipt> {
    Ok(TxReceipt {
        hash,
        block_number: parse_quantity(&receipt["blockNumber"], "receipt blockNumber")?,
        gas_used: parse_quantity(&receipt["gasUsed"], "receipt gasUsed")?,
        success: parse_quantity(&receipt["status"], "receipt status")? == 1,
    })
}

/// Map a failed historical `eth_call` onto the oracle error it represents
pub fn classify_call_error(message: String, contract: Address, block: u64) -> VaultError {
    if matches_any(&message, UNKNOWN_BLOCK_MARKERS) {
        VaultError::BlockNotFound { block }
    } else if matches_any(&message, PRUNED_STATE_MARKERS) {
        VaultError::HistoricalStateUnavailable {
            contract,
            block,
            message,
        }
    } else {
        VaultError::Rpc(message)
    }
}

fn matches_any(message: &str, markers: &[&str]) -> bool {
    let lower = message.to_lowercase();
    markers.iter().any(|marker| lower.contains(marker))
}

/// Parse a hex-encoded JSON-RPC quantity
fn parse_quantity(value: &Value, what: &str) -> Result<u64> {
    let hex_str = value
        .as_str()
        .ok_or_else(|| VaultError::decode(what, value))?;
    u64::from_str_radix(hex_str.trim_start_matches("0x"), 16)
        .map_err(|e| VaultError::decode(what, e))
}
