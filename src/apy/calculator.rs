use crate::amount::to_f64;
use crate::apy::types::*;
use crate::error::Result;
use crate::oracle::{RateOracle, RateSource};

/// Annualize the growth of a rate between two samples.
///
/// Returns `None` for an undefined window: zero start rate, start not before
/// end, or less than one whole day between the samples.
pub fn compute_window_yield(window: &YieldWindow) -> Option<WindowYield> {
    if window.start.rate.is_zero() {
        return None;
    }
    let days = window.days()?;
    if days == 0 {
        return None;
    }

    let ratio = to_f64(window.end.rate, 0) / to_f64(window.start.rate, 0);
    let annualized_rate = ratio.powf(365.0 / days as f64) - 1.0;
    let percent_change = (ratio - 1.0) * 100.0;

    Some(WindowYield {
        annualized_rate,
        days,
        percent_change,
    })
}

/// Blends the yields of several rate sources over a lookback window
#[derive(Clone)]
pub struct YieldCalculator {
    oracle: RateOracle,
}

impl YieldCalculator {
    pub fn new(oracle: RateOracle) -> Self {
        Self { oracle }
    }

    /// Yield of every source over the last `lookback_days`.
    ///
    /// A source that cannot be resolved is reported as unavailable instead of
    /// failing the whole composite; only a failure to read the head block does.
    pub async fn compute_composite(
        &self,
        sources: &[RateSource],
        lookback_days: u64,
        blocks_per_day: u64,
    ) -> Result<CompositeYield> {
        let current_block = self.oracle.current_block().await?;
        let past_block = lookback_days
            .checked_mul(blocks_per_day)
            .and_then(|span| current_block.checked_sub(span));

        let mut components = Vec::with_capacity(sources.len());
        for source in sources {
            let outcome = match self.source_yield(source, current_block, past_block).await {
                Ok(window) => YieldOutcome::Resolved(window),
                Err(reason) => {
                    log::warn!("[Yield] {} unavailable: {}", source.id, reason);
                    YieldOutcome::Unavailable { reason }
                }
            };
            components.push(SourceYield {
                source: source.id.clone(),
                outcome,
            });
        }

        Ok(CompositeYield { components })
    }

    async fn source_yield(
        &self,
        source: &RateSource,
        current_block: u64,
        past_block: Option<u64>,
    ) -> std::result::Result<WindowYield, String> {
        let past_block = past_block.ok_or_else(|| {
            format!("lookback reaches before genesis from block {}", current_block)
        })?;

        let end = self
            .oracle
            .get_rate(source, Some(current_block))
            .await
            .map_err(|e| e.to_string())?;
        let start = self
            .oracle
            .get_rate(source, Some(past_block))
            .await
            .map_err(|e| e.to_string())?;

        let window = YieldWindow::new(start, end);
        let result = compute_window_yield(&window);
        result.ok_or_else(|| {
            format!(
                "undefined window: rate {} -> {} between {} and {}",
                window.start.rate, window.end.rate, window.start.timestamp, window.end.timestamp
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::RateSample;
    use crate::testing::MockChain;
    use alloy_primitives::{Address, U256};
    use std::sync::Arc;
    use test_case::test_case;

    fn sample(rate: u64, timestamp: u64) -> RateSample {
        RateSample {
            source: "test".to_string(),
            rate: U256::from(rate),
            block: 0,
            timestamp,
        }
    }

    fn window(start_rate: u64, end_rate: u64, start_ts: u64, end_ts: u64) -> YieldWindow {
        YieldWindow::new(sample(start_rate, start_ts), sample(end_rate, end_ts))
    }

    #[test]
    fn test_thirty_day_window() {
        let yield_ = compute_window_yield(&window(100, 110, 0, 30 * SECONDS_PER_DAY)).unwrap();

        assert_eq!(yield_.days, 30);
        assert!((yield_.annualized_rate - (1.1f64.powf(365.0 / 30.0) - 1.0)).abs() < 1e-12);
        assert!((yield_.annualized_rate - 2.18868).abs() < 1e-3);
        assert!((yield_.percent_change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_days_truncate() {
        let yield_ =
            compute_window_yield(&window(100, 101, 0, 30 * SECONDS_PER_DAY + 86_399)).unwrap();
        assert_eq!(yield_.days, 30);
    }

    #[test_case(0, 110, 0, 2_592_000 ; "zero start rate")]
    #[test_case(100, 110, 2_592_000, 2_592_000 ; "equal timestamps")]
    #[test_case(100, 110, 2_592_000, 0 ; "reversed window")]
    #[test_case(100, 110, 0, 86_399 ; "under one day")]
    fn test_undefined_windows(start_rate: u64, end_rate: u64, start_ts: u64, end_ts: u64) {
        assert_eq!(compute_window_yield(&window(start_rate, end_rate, start_ts, end_ts)), None);
    }

    #[test]
    fn test_monotonic_in_end_rate() {
        let span = 30 * SECONDS_PER_DAY;
        let mut previous = f64::NEG_INFINITY;
        for end_rate in [90u64, 99, 100, 101, 110, 150] {
            let current = compute_window_yield(&window(100, end_rate, 0, span))
                .unwrap()
                .annualized_rate;
            assert!(current > previous, "{} should exceed {}", current, previous);
            previous = current;
        }
    }

    #[test]
    fn test_flat_rate_is_zero_not_undefined() {
        let yield_ = compute_window_yield(&window(100, 100, 0, 7 * SECONDS_PER_DAY)).unwrap();
        assert_eq!(yield_.annualized_rate, 0.0);
    }

    const STRATEGY: Address = Address::repeat_byte(0xa1);
    const LBTC: Address = Address::repeat_byte(0xb2);
    const HEAD: u64 = 21_000_000;
    const LOOKBACK_BLOCKS: u64 = 30 * 7200;

    fn sources() -> Vec<RateSource> {
        vec![
            RateSource::new("strategy", STRATEGY, 8),
            RateSource::new("lbtc", LBTC, 18),
        ]
    }

    fn chain_with_history() -> MockChain {
        // 12s blocks: 30 days of blocks span exactly 30 days
        let chain = MockChain::new().with_head(HEAD, 1_750_000_000);
        chain.set_rate(STRATEGY, HEAD - LOOKBACK_BLOCKS, U256::from(100_000_000u64));
        chain.set_rate(STRATEGY, HEAD, U256::from(100_400_000u64));
        chain.set_rate(LBTC, HEAD - LOOKBACK_BLOCKS, U256::from(1_000_000_000_000_000_000u64));
        chain.set_rate(LBTC, HEAD, U256::from(1_001_000_000_000_000_000u64));
        chain
    }

    #[tokio::test]
    async fn test_composite_sums_sources() {
        let calculator = YieldCalculator::new(RateOracle::new(Arc::new(chain_with_history())));

        let composite = calculator.compute_composite(&sources(), 30, 7200).await.unwrap();

        let strategy = composite.component("strategy").unwrap().annualized_rate().unwrap();
        let lbtc = composite.component("lbtc").unwrap().annualized_rate().unwrap();
        assert!((strategy - (1.004f64.powf(365.0 / 30.0) - 1.0)).abs() < 1e-9);
        assert!((lbtc - (1.001f64.powf(365.0 / 30.0) - 1.0)).abs() < 1e-9);
        assert!((composite.total() - (strategy + lbtc)).abs() < 1e-12);
        assert_eq!(composite.unavailable().count(), 0);
    }

    #[tokio::test]
    async fn test_composite_degrades_when_history_is_pruned() {
        let chain = chain_with_history();
        chain.prune_source_before(STRATEGY, HEAD - 100);
        let calculator = YieldCalculator::new(RateOracle::new(Arc::new(chain)));

        let composite = calculator.compute_composite(&sources(), 30, 7200).await.unwrap();

        let strategy = composite.component("strategy").unwrap();
        assert!(!strategy.is_available());
        assert_eq!(strategy.annualized_rate(), None);

        let standalone = compute_window_yield(&window(
            1_000_000_000,
            1_001_000_000,
            0,
            30 * SECONDS_PER_DAY,
        ))
        .unwrap()
        .annualized_rate;
        assert!((composite.total() - standalone).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_lookback_before_genesis_is_unavailable() {
        let chain = MockChain::new().with_head(1_000, 1_750_000_000);
        chain.set_rate(STRATEGY, 0, U256::from(100u64));
        let calculator = YieldCalculator::new(RateOracle::new(Arc::new(chain)));

        let composite = calculator
            .compute_composite(&sources()[..1], 30, 7200)
            .await
            .unwrap();

        assert_eq!(composite.total(), 0.0);
        assert!(matches!(
            &composite.components[0].outcome,
            YieldOutcome::Unavailable { reason } if reason.contains("genesis")
        ));
    }
}
