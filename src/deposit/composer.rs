use alloy_primitives::Address;
use std::sync::Arc;

use crate::allowance::AllowanceManager;
use crate::amount::parse_amount;
use crate::authorization::AuthorizationGate;
use crate::chain::{ChainReader, TransactionSubmitter};
use crate::config::{VaultContracts, DEPOSIT_SELECTOR, SHARE_PREMIUM_BPS};
use crate::deposit::types::*;
use crate::error::{Result, VaultError};

/// Builds and sends teller deposits for a single asset
pub struct DepositComposer {
    chain: Arc<dyn ChainReader>,
    submitter: Arc<dyn TransactionSubmitter>,
    gate: AuthorizationGate,
    allowances: AllowanceManager,
    contracts: VaultContracts,
    asset: Address,
    policy: MinimumSharesPolicy,
}

impl DepositComposer {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        submitter: Arc<dyn TransactionSubmitter>,
        contracts: VaultContracts,
        asset: Address,
        policy: MinimumSharesPolicy,
    ) -> Self {
        let gate =
            AuthorizationGate::new(chain.clone(), contracts.roles_authority, contracts.teller);
        let allowances = AllowanceManager::new(chain.clone(), submitter.clone());
        Self {
            chain,
            submitter,
            gate,
            allowances,
            contracts,
            asset,
            policy,
        }
    }

    /// Deposit `amount` (a decimal string in asset units) and wait for it to be mined.
    ///
    /// Balance and authorization are checked before anything is sent. An approval
    /// that succeeded stays in place if the deposit itself then fails.
    pub async fn deposit(&self, amount: &str) -> Result<DepositOutcome> {
        let depositor = self.submitter.sender();

        let decimals = self.chain.decimals(self.asset).await?;
        let amount_units = parse_amount(amount, decimals)?;
        if amount_units.is_zero() {
            return Err(VaultError::invalid_amount(amount, "amount must be greater than zero"));
        }
        let intent = DepositIntent {
            asset: self.asset,
            amount: amount_units,
            depositor,
        };
        log::debug!("[Deposit] {} units of {} from {}", intent.amount, intent.asset, depositor);

        let balance = self.chain.balance_of(self.asset, depositor).await?;
        if balance < intent.amount {
            return Err(VaultError::InsufficientBalance {
                asset: self.asset,
                account: depositor,
                balance,
                required: intent.amount,
            });
        }

        if !self.gate.can_deposit(depositor).await? {
            return Err(VaultError::NotAuthorized {
                account: depositor,
                target: self.gate.teller(),
                selector: format!("0x{}", hex::encode(DEPOSIT_SELECTOR)),
            });
        }

        let quote_rate = self
            .chain
            .rate_in_quote(self.contracts.accountant, self.asset)
            .await?;
        if quote_rate.is_zero() {
            return Err(VaultError::ZeroQuoteRate { asset: self.asset });
        }
        let expected = expected_shares(intent.amount, quote_rate, SHARE_PREMIUM_BPS)
            .ok_or_else(|| VaultError::invalid_amount(amount, "amount overflows share pricing"))?;
        let minimum_mint = self.policy.minimum_mint(expected);
        log::debug!(
            "[Deposit] Quote rate {}, expecting ~{} shares, minimum {}",
            quote_rate,
            expected,
            minimum_mint
        );

        // The vault pulls the asset on the teller's behalf
        let approval = self
            .allowances
            .ensure_allowance(self.asset, depositor, self.contracts.vault, intent.amount)
            .await?;

        log::info!("[Deposit] Depositing {} of {}", intent.amount, self.asset);
        let hash = self
            .submitter
            .deposit(self.contracts.teller, self.asset, intent.amount, minimum_mint)
            .await?;
        let receipt = self.submitter.wait_for_receipt(hash).await?;
        if !receipt.success {
            return Err(VaultError::TransactionReverted { hash, reason: None });
        }
        log::info!("[Deposit] Confirmed {} in block {}", hash, receipt.block_number);

        Ok(DepositOutcome {
            intent,
            quote_rate,
            expected_shares: expected,
            minimum_mint,
            approval,
            receipt,
        })
    }
}
