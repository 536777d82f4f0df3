pub mod prices;
pub mod subscribers;

use std::sync::Arc;
use std::time::Duration;

use crate::market_data::PriceSource;
pub use prices::{PriceSnapshot, PriceTracker};
pub use subscribers::{SubscriberId, SubscriberRegistry};

/// Settings the command handlers and the monitor both need to read.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub check_interval: Duration,
    pub fetch_timeout: Duration,
    pub threshold: f64,
    /// Display name of the tracked asset, e.g. "ethereum".
    pub asset: String,
    /// Quote currency code, e.g. "usd".
    pub currency: String,
}

/// Everything shared between the price monitor and the chat command handlers.
pub struct AppState {
    pub subscribers: SubscriberRegistry,
    pub prices: PriceTracker,
    pub quotes: Arc<dyn PriceSource>,
    pub settings: MonitorSettings,
}

impl AppState {
    pub fn new(quotes: Arc<dyn PriceSource>, settings: MonitorSettings) -> Self {
        Self {
            subscribers: SubscriberRegistry::new(),
            prices: PriceTracker::new(),
            quotes,
            settings,
        }
    }
}
