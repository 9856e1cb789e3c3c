//! Types shared by chain readers and transaction submitters

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// Block a read is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(u64),
}

impl BlockTag {
    /// JSON-RPC encoding of the tag
    pub fn to_rpc_param(&self) -> String {
        match self {
            BlockTag::Latest => "latest".to_string(),
            BlockTag::Number(n) => format!("0x{:x}", n),
        }
    }
}

/// Mined transaction receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    /// `false` when the transaction reverted
    pub success: bool,
}
