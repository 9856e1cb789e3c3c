// src/context.rs
//! Shared handles for one client session

use alloy_primitives::Address;
use std::sync::Arc;

use crate::apy::{default_sources, CompositeYield, YieldCalculator};
use crate::chain::{ChainReader, RpcChainClient, RpcTransactionSubmitter, TransactionSubmitter};
use crate::config::ClientConfig;
use crate::chain::TxReceipt;
use crate::deposit::DepositComposer;
use crate::display;
use crate::error::{Result, VaultError};
use crate::oracle::RateOracle;
use crate::report::{HttpPriceFeed, SpotPriceFeed, VaultReporter};
use crate::withdrawal::WithdrawalComposer;

/// Configuration plus the chain, signer and price feed built from it.
///
/// Built once at startup and handed to whatever needs a component.
pub struct ClientContext {
    config: ClientConfig,
    chain: Arc<dyn ChainReader>,
    submitter: Option<Arc<dyn TransactionSubmitter>>,
    price_feed: Arc<dyn SpotPriceFeed>,
}

impl ClientContext {
    /// Connect the JSON-RPC and price feed adapters described by `config`
    pub fn from_config(config: ClientConfig) -> Self {
        let client = RpcChainClient::new(&config.rpc_url);
        let submitter = config.signer.map(|from| {
            Arc::new(RpcTransactionSubmitter::new(client.clone(), from, config.confirmation))
                as Arc<dyn TransactionSubmitter>
        });
        let price_feed = Arc::new(HttpPriceFeed::new(
            &config.price_feed_url,
            config.price_feed_path.clone(),
        ));

        log::info!(
            "[Context] RPC {}, signer {}",
            config.rpc_url,
            config
                .signer
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        Self::from_parts(config, Arc::new(client), submitter, price_feed)
    }

    pub fn from_parts(
        config: ClientConfig,
        chain: Arc<dyn ChainReader>,
        submitter: Option<Arc<dyn TransactionSubmitter>>,
        price_feed: Arc<dyn SpotPriceFeed>,
    ) -> Self {
        Self {
            config,
            chain,
            submitter,
            price_feed,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Account transactions are sent from, if any
    pub fn signer(&self) -> Option<Address> {
        self.submitter.as_ref().map(|s| s.sender())
    }

    pub fn reporter(&self) -> VaultReporter {
        VaultReporter::new(self.chain.clone(), self.price_feed.clone(), self.config.contracts)
    }

    pub fn yield_calculator(&self) -> YieldCalculator {
        YieldCalculator::new(RateOracle::new(self.chain.clone()))
    }

    /// Composite yield of the default sources over the configured lookback
    pub async fn current_yield(&self) -> Result<CompositeYield> {
        self.yield_calculator()
            .compute_composite(
                &default_sources(&self.config.contracts),
                self.config.lookback_days,
                self.config.blocks_per_day,
            )
            .await
    }

    pub fn deposit_composer(&self) -> Result<DepositComposer> {
        let submitter = self.submitter()?;
        Ok(DepositComposer::new(
            self.chain.clone(),
            submitter,
            self.config.contracts,
            self.config.deposit_asset,
            self.config.minimum_shares,
        ))
    }

    pub fn withdrawal_composer(&self) -> Result<WithdrawalComposer> {
        let submitter = self.submitter()?;
        Ok(WithdrawalComposer::new(
            self.chain.clone(),
            submitter,
            self.config.contracts,
            self.config.withdraw_asset,
            self.config.withdraw_deadline_days,
        ))
    }

    /// Print the vault report through `emit`, then run the configured deposit
    /// and withdrawal.
    ///
    /// A failed metadata or yield read only trims the report. Settlement errors
    /// end the session.
    pub async fn run_session<F>(&self, mut emit: F) -> Result<()>
    where
        F: FnMut(String),
    {
        let reporter = self.reporter();
        let (metadata, composite) = tokio::join!(reporter.get_metadata(), self.current_yield());
        let metadata = match metadata {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                log::warn!("[Context] Vault report unavailable: {}", e);
                None
            }
        };
        let composite = match composite {
            Ok(composite) => Some(composite),
            Err(e) => {
                log::warn!("[Context] Yield unavailable: {}", e);
                None
            }
        };

        for line in display::report_lines(metadata.as_ref(), composite.as_ref()) {
            emit(line);
        }
        emit(String::new());

        let Some(wallet) = self.signer() else {
            log::info!("[Context] No signer configured, skipping deposit and withdrawal");
            return Ok(());
        };

        emit(display::format_wallet(wallet));
        let before = reporter.share_balance(wallet).await?;
        emit(display::format_share_balance("before", before));

        if let Some(amount) = &self.config.deposit_amount {
            emit("Depositing...".to_string());
            let outcome = self.deposit_composer()?.deposit(amount).await?;
            emit_receipts(&mut emit, outcome.approval.as_ref(), &outcome.receipt);

            let after = reporter.share_balance(wallet).await?;
            emit(display::format_share_balance("after", after));
        }

        if let Some(amount) = &self.config.withdraw_amount {
            emit("Withdrawing...".to_string());
            let outcome = self.withdrawal_composer()?.request_withdrawal(amount).await?;
            emit_receipts(&mut emit, outcome.approval.as_ref(), &outcome.receipt);

            let last = reporter.share_balance(wallet).await?;
            emit(display::format_share_balance("final", last));
        }

        emit("Complete!".to_string());
        Ok(())
    }

    fn submitter(&self) -> Result<Arc<dyn TransactionSubmitter>> {
        self.submitter.clone().ok_or(VaultError::SignerUnavailable)
    }

    /// Release the session's handles and flush buffered log output
    pub fn shutdown(self) {
        log::info!("[Context] Shutting down");
        log::Log::flush(log::logger());
    }
}

fn emit_receipts<F>(emit: &mut F, approval: Option<&TxReceipt>, receipt: &TxReceipt)
where
    F: FnMut(String),
{
    if let Some(approval) = approval {
        emit(display::format_receipt(approval));
    }
    emit(display::format_receipt(receipt));
}
