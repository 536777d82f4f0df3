use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_PRICE_THRESHOLD: f64 = 50.0;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_QUOTE_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
pub const DEFAULT_ASSET_ID: &str = "ethereum";
pub const DEFAULT_CURRENCY: &str = "usd";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Where quotes come from: endpoint plus the single asset/currency pair tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSettings {
    pub api_url: String,
    pub asset_id: String,
    pub currency: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub check_interval: Duration,
    pub price_threshold: f64,
    pub quote: QuoteSettings,
    pub metrics_port: Option<u16>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"[REDACTED]")
            .field("check_interval", &self.check_interval)
            .field("price_threshold", &self.price_threshold)
            .field("quote", &self.quote)
            .field("metrics_port", &self.metrics_port)
            .finish()
    }
}

impl Config {
    /// Reads the process environment. `.env` is loaded by `main` before this runs.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;

        let check_interval = match get("CHECK_INTERVAL") {
            Some(raw) => Duration::from_secs(parse_positive_secs("CHECK_INTERVAL", raw)?),
            None => Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
        };

        let fetch_timeout = match get("FETCH_TIMEOUT") {
            Some(raw) => Duration::from_secs(parse_positive_secs("FETCH_TIMEOUT", raw)?),
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        let price_threshold = match get("PRICE_THRESHOLD") {
            Some(raw) => parse_threshold(raw)?,
            None => DEFAULT_PRICE_THRESHOLD,
        };

        let metrics_port = match get("METRICS_PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "METRICS_PORT",
                value: raw,
                reason: "expected a port number",
            })?),
            None => None,
        };

        let quote = QuoteSettings {
            api_url: get("QUOTE_API_URL").unwrap_or_else(|| DEFAULT_QUOTE_API_URL.to_string()),
            asset_id: get("QUOTE_ASSET_ID").unwrap_or_else(|| DEFAULT_ASSET_ID.to_string()),
            currency: get("QUOTE_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            timeout: fetch_timeout,
        };

        Ok(Self {
            bot_token,
            check_interval,
            price_threshold,
            quote,
            metrics_port,
        })
    }
}

fn parse_positive_secs(key: &'static str, raw: String) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected a whole number of seconds greater than zero",
        }),
    }
}

fn parse_threshold(raw: String) -> Result<f64, ConfigError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::Invalid {
            key: "PRICE_THRESHOLD",
            value: raw,
            reason: "expected a positive number",
        }),
    }
}
