// src/allowance.rs
use alloy_primitives::{Address, U256};
use std::sync::Arc;

use crate::chain::{ChainReader, TransactionSubmitter, TxReceipt};
use crate::error::{Result, VaultError};

/// Raises ERC-20 allowances only when they fall short; never lowers them
#[derive(Clone)]
pub struct AllowanceManager {
    chain: Arc<dyn ChainReader>,
    submitter: Arc<dyn TransactionSubmitter>,
}

impl AllowanceManager {
    pub fn new(chain: Arc<dyn ChainReader>, submitter: Arc<dyn TransactionSubmitter>) -> Self {
        Self { chain, submitter }
    }

    /// Make sure `spender` may pull `required` of `token` from `owner`.
    ///
    /// Approves exactly `required` when the current allowance is lower and waits
    /// for the approval to be mined. Returns the approval receipt, or `None` when
    /// the allowance was already sufficient.
    pub async fn ensure_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        required: U256,
    ) -> Result<Option<TxReceipt>> {
        let current = self.chain.allowance(token, owner, spender).await?;
        if current >= required {
            log::debug!("[Allowance] {} -> {} already {} >= {}", owner, spender, current, required);
            return Ok(None);
        }

        log::info!("[Allowance] Approving {} of {} for {}", required, token, spender);
        let rejected = |reason: String| VaultError::ApprovalRejected {
            token,
            spender,
            amount: required,
            reason,
        };

        let hash = self
            .submitter
            .approve(token, spender, required)
            .await
            .map_err(|e| rejected(e.to_string()))?;
        let receipt = self
            .submitter
            .wait_for_receipt(hash)
            .await
            .map_err(|e| rejected(e.to_string()))?;

        if !receipt.success {
            return Err(rejected(format!("approval {} reverted", receipt.hash)));
        }

        log::info!("[Allowance] Approved in block {}", receipt.block_number);
        Ok(Some(receipt))
    }
}
