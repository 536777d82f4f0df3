use async_trait::async_trait;

use super::types::{Price, QuoteError};

/// Anything that can produce the current price of the tracked asset.
///
/// One call is one attempt: implementations do not retry. The polling
/// cadence of the caller is the retry policy.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self) -> Result<Price, QuoteError>;
}
