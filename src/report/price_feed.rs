use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{Result, VaultError};

/// Source of the fiat spot price used for TVL
#[async_trait]
pub trait SpotPriceFeed: Send + Sync {
    async fn spot_price(&self) -> Result<f64>;
}

/// Spot price read from a JSON endpoint such as `{"bitcoin": {"usd": 97000.5}}`
#[derive(Clone)]
pub struct HttpPriceFeed {
    client: Client,
    url: String,
    path: Vec<String>,
}

impl HttpPriceFeed {
    pub fn new(url: &str, path: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
            path,
        }
    }
}

#[async_trait]
impl SpotPriceFeed for HttpPriceFeed {
    async fn spot_price(&self) -> Result<f64> {
        if self.url.is_empty() {
            return Err(VaultError::PriceFeedUnavailable(
                "no price feed URL configured".to_string(),
            ));
        }

        log::debug!("[PriceFeed] GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| VaultError::PriceFeedUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VaultError::PriceFeedUnavailable(format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VaultError::PriceFeedUnavailable(format!("invalid JSON: {}", e)))?;

        extract_price(&body, &self.path)
    }
}

/// Follow `path` through nested objects to a number
pub fn extract_price(body: &Value, path: &[String]) -> Result<f64> {
    let mut current = body;
    for key in path {
        current = current.get(key.as_str()).ok_or_else(|| {
            VaultError::PriceFeedUnavailable(format!("missing field {}", path.join(".")))
        })?;
    }

    let price = current.as_f64().ok_or_else(|| {
        VaultError::PriceFeedUnavailable(format!(
            "field {} is not a number: {}",
            path.join("."),
            current
        ))
    })?;
    if !price.is_finite() || price < 0.0 {
        return Err(VaultError::PriceFeedUnavailable(format!("unusable price {}", price)));
    }
    Ok(price)
}
