//! Vault metadata and TVL reporting

mod price_feed;
mod reporter;
mod types;

pub use price_feed::{extract_price, HttpPriceFeed, SpotPriceFeed};
pub use reporter::VaultReporter;
pub use types::VaultMetadata;
