use alloy_primitives::{Address, U256};
use std::sync::Arc;

use crate::amount::to_f64;
use crate::chain::{BlockTag, ChainReader};
use crate::config::VaultContracts;
use crate::error::Result;
use crate::report::price_feed::SpotPriceFeed;
use crate::report::types::VaultMetadata;

/// Read-only view of the vault for the status report
pub struct VaultReporter {
    chain: Arc<dyn ChainReader>,
    price_feed: Arc<dyn SpotPriceFeed>,
    contracts: VaultContracts,
}

impl VaultReporter {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        price_feed: Arc<dyn SpotPriceFeed>,
        contracts: VaultContracts,
    ) -> Self {
        Self {
            chain,
            price_feed,
            contracts,
        }
    }

    /// Token metadata plus TVL in the base asset and in fiat
    pub async fn get_metadata(&self) -> Result<VaultMetadata> {
        let vault = self.contracts.vault;
        let accountant = self.contracts.accountant;

        let (name, symbol, decimals, total_supply, rate, rate_decimals) = tokio::try_join!(
            self.chain.name(vault),
            self.chain.symbol(vault),
            self.chain.decimals(vault),
            self.chain.total_supply(vault),
            self.chain.rate(accountant, BlockTag::Latest),
            self.chain.decimals(accountant),
        )?;
        log::debug!(
            "[Reporter] {} ({}): supply {}, rate {} ({} decimals)",
            name,
            symbol,
            total_supply,
            rate,
            rate_decimals
        );

        let tvl_native = native_tvl(total_supply, decimals, rate, rate_decimals);
        let spot_price = self.price_feed.spot_price().await?;

        Ok(VaultMetadata {
            name,
            symbol,
            decimals,
            total_supply,
            rate,
            rate_decimals,
            tvl_native,
            spot_price,
            tvl_quote: tvl_native * spot_price,
        })
    }

    /// Vault shares held by `account`
    pub async fn share_balance(&self, account: Address) -> Result<U256> {
        self.chain.balance_of(self.contracts.vault, account).await
    }
}

/// `total_supply * rate / 10^(supply_decimals + rate_decimals)`
fn native_tvl(total_supply: U256, supply_decimals: u8, rate: U256, rate_decimals: u8) -> f64 {
    let scale = supply_decimals.saturating_add(rate_decimals);
    match total_supply.checked_mul(rate) {
        Some(product) if scale <= 77 => to_f64(product, scale),
        _ => to_f64(total_supply, supply_decimals) * to_f64(rate, rate_decimals),
    }
}
