use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::QuoteSettings;
use crate::market_data::traits::PriceSource;
use crate::market_data::types::{Price, QuoteError};

/// CoinGecko `simple/price` client for a single asset/currency pair.
///
/// Holds one pooled `reqwest::Client`; connections are released when the
/// client is dropped.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    url: String,
    asset_id: String,
    currency: String,
}

impl CoinGeckoClient {
    pub fn new(settings: &QuoteSettings) -> Result<Self, QuoteError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: settings.api_url.clone(),
            asset_id: settings.asset_id.clone(),
            currency: settings.currency.clone(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_price(&self) -> Result<Price, QuoteError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("ids", self.asset_id.as_str()), ("vs_currencies", self.currency.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let price = extract_price(&body, &self.asset_id, &self.currency)?;

        debug!(asset = %self.asset_id, currency = %self.currency, price, "quote fetched");
        Ok(price)
    }
}

/// Pulls `body[asset][currency]` out of a `simple/price` payload.
pub fn extract_price(body: &[u8], asset: &str, currency: &str) -> Result<Price, QuoteError> {
    let json: Value = serde_json::from_slice(body).map_err(|e| QuoteError::Decode(e.to_string()))?;

    let raw = json
        .get(asset)
        .and_then(|quotes| quotes.get(currency))
        .ok_or_else(|| QuoteError::MissingField {
            asset: asset.to_string(),
            currency: currency.to_string(),
        })?;

    let price = raw
        .as_f64()
        .ok_or_else(|| QuoteError::NotNumeric(raw.to_string()))?;

    if !price.is_finite() || price < 0.0 {
        return Err(QuoteError::InvalidPrice(price));
    }

    Ok(price)
}
