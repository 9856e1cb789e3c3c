//! Point-in-time exchange rates

mod types;

use std::sync::Arc;

use crate::chain::{BlockTag, ChainReader};
use crate::error::Result;

pub use types::*;

/// Reads rates from accountants and rate providers at arbitrary blocks.
///
/// Every call is a fresh read; pin `at_block` when several samples must agree.
#[derive(Clone)]
pub struct RateOracle {
    chain: Arc<dyn ChainReader>,
}

impl RateOracle {
    pub fn new(chain: Arc<dyn ChainReader>) -> Self {
        Self { chain }
    }

    /// Sample a source's rate, at the head block when `at_block` is `None`
    pub async fn get_rate(&self, source: &RateSource, at_block: Option<u64>) -> Result<RateSample> {
        let block = match at_block {
            Some(block) => block,
            None => self.chain.block_number().await?,
        };

        let rate = self.chain.rate(source.address, BlockTag::Number(block)).await?;
        let timestamp = self.get_block_timestamp(block).await?;

        log::debug!("[Oracle] {} rate {} at block {} ({})", source.id, rate, block, timestamp);

        Ok(RateSample {
            source: source.id.clone(),
            rate,
            block,
            timestamp,
        })
    }

    pub async fn get_block_timestamp(&self, block: u64) -> Result<u64> {
        self.chain.block_timestamp(block).await
    }

    pub async fn current_block(&self) -> Result<u64> {
        self.chain.block_number().await
    }
}
