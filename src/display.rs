// src/display.rs
//! Status lines printed by the binary

use alloy_primitives::{Address, U256};

use crate::amount::format_amount;
use crate::apy::{CompositeYield, YieldOutcome};
use crate::chain::TxReceipt;
use crate::config::SHARE_DECIMALS;
use crate::report::VaultMetadata;

/// Vault, APY, TVL and token lines of the report header.
///
/// Lines whose data could not be read are left out.
pub fn report_lines(
    metadata: Option<&VaultMetadata>,
    composite: Option<&CompositeYield>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(metadata) = metadata {
        lines.push(format!("Vault: {}", metadata.name));
    }
    if let Some(composite) = composite {
        lines.push(format_apy(composite.total()));
    }
    if let Some(metadata) = metadata {
        lines.push(format_tvl(metadata.tvl_quote));
        lines.push(format!("Token: {} ({} decimals)", metadata.symbol, metadata.decimals));
    }
    if let Some(composite) = composite {
        lines.extend(unavailable_lines(composite));
    }
    lines
}

pub fn format_apy(total: f64) -> String {
    format!("APY: {:.4}%", total * 100.0)
}

pub fn format_tvl(tvl_quote: f64) -> String {
    format!("TVL: ${:.2}", tvl_quote)
}

/// One line per source left out of the APY
pub fn unavailable_lines(composite: &CompositeYield) -> Vec<String> {
    composite
        .components
        .iter()
        .filter_map(|component| match &component.outcome {
            YieldOutcome::Unavailable { reason } => {
                Some(format!("  ({} yield unavailable: {})", component.source, reason))
            }
            YieldOutcome::Resolved(_) => None,
        })
        .collect()
}

pub fn format_wallet(address: Address) -> String {
    format!("Wallet: {}", address)
}

/// `label` is "before", "after" or "final"
pub fn format_share_balance(label: &str, shares: U256) -> String {
    format!("Balance {}: {}", label, format_amount(shares, SHARE_DECIMALS))
}

pub fn format_receipt(receipt: &TxReceipt) -> String {
    format!(
        "Tx: {} | Block: {} | Gas: {}",
        receipt.hash, receipt.block_number, receipt.gas_used
    )
}
