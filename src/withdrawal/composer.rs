use alloy_primitives::{Address, U256};
use std::sync::Arc;

use crate::allowance::AllowanceManager;
use crate::amount::parse_amount;
use crate::chain::{ChainReader, TransactionSubmitter};
use crate::config::{VaultContracts, SHARE_DECIMALS, WITHDRAW_DISCOUNT_BPS};
use crate::error::{Result, VaultError};
use crate::withdrawal::types::*;

/// Places atomic withdrawal requests for vault shares
pub struct WithdrawalComposer {
    chain: Arc<dyn ChainReader>,
    submitter: Arc<dyn TransactionSubmitter>,
    allowances: AllowanceManager,
    contracts: VaultContracts,
    want_asset: Address,
    deadline_days: u64,
}

impl WithdrawalComposer {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        submitter: Arc<dyn TransactionSubmitter>,
        contracts: VaultContracts,
        want_asset: Address,
        deadline_days: u64,
    ) -> Self {
        let allowances = AllowanceManager::new(chain.clone(), submitter.clone());
        Self {
            chain,
            submitter,
            allowances,
            contracts,
            want_asset,
            deadline_days,
        }
    }

    /// Request a withdrawal of `amount` shares, with the deadline measured from now
    pub async fn request_withdrawal(&self, amount: &str) -> Result<WithdrawalOutcome> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.request_withdrawal_at(amount, now).await
    }

    /// Request a withdrawal of `amount` shares with the deadline measured from
    /// `now` (epoch seconds)
    pub async fn request_withdrawal_at(&self, amount: &str, now: u64) -> Result<WithdrawalOutcome> {
        let owner = self.submitter.sender();

        let offer_amount = parse_amount(amount, SHARE_DECIMALS)?;
        if offer_amount.is_zero() {
            return Err(VaultError::invalid_amount(amount, "amount must be greater than zero"));
        }
        if offer_amount.bit_len() > 96 {
            return Err(VaultError::invalid_amount(amount, "amount does not fit in uint96"));
        }

        let shares = self.chain.balance_of(self.contracts.vault, owner).await?;
        log::debug!("[Withdraw] {} holds {} shares, offering {}", owner, shares, offer_amount);
        if shares < offer_amount {
            return Err(VaultError::InsufficientShares {
                account: owner,
                balance: shares,
                required: offer_amount,
            });
        }

        let approval = self
            .allowances
            .ensure_allowance(
                self.contracts.vault,
                owner,
                self.contracts.atomic_queue,
                offer_amount,
            )
            .await?;

        let request = WithdrawalRequest {
            offer_token: self.contracts.vault,
            want_token: self.want_asset,
            deadline: deadline_after(now, self.deadline_days),
            offer_amount,
            atomic_price: 0,
            in_solve: false,
            accountant: self.contracts.accountant,
            discount_bps: WITHDRAW_DISCOUNT_BPS,
        };

        log::info!(
            "[Withdraw] Requesting {} shares for {}, deadline {}",
            request.offer_amount,
            request.want_token,
            request.deadline
        );
        let hash = self
            .submitter
            .update_atomic_request(self.contracts.atomic_queue, &request)
            .await?;
        let receipt = self.submitter.wait_for_receipt(hash).await?;
        if !receipt.success {
            return Err(VaultError::TransactionReverted { hash, reason: None });
        }
        log::info!("[Withdraw] Confirmed {} in block {}", hash, receipt.block_number);

        Ok(WithdrawalOutcome {
            request,
            approval,
            receipt,
        })
    }

    pub fn want_asset(&self) -> Address {
        self.want_asset
    }

    /// Vault share balance of the sending account
    pub async fn share_balance(&self) -> Result<U256> {
        self.chain.balance_of(self.contracts.vault, self.submitter.sender()).await
    }
}
