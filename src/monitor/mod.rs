pub mod threshold;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::market_data::{Price, QuoteError};
use crate::metrics::prometheus;
use crate::notify::{DispatchReport, MessageSink, NotificationDispatcher};
use crate::state::AppState;
use threshold::Decision;

/// Result of one monitor iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    FetchFailed,
    Baseline { price: Price },
    Held { price: Price, delta: Price },
    Notified { price: Price, delta: Price, report: DispatchReport },
}

/// Periodic fetch → compare → alert loop over the shared [`AppState`].
pub struct PriceMonitor {
    state: Arc<AppState>,
    dispatcher: NotificationDispatcher,
}

impl PriceMonitor {
    pub fn new(state: Arc<AppState>, sink: Arc<dyn MessageSink>) -> Self {
        let dispatcher = NotificationDispatcher::new(
            sink,
            state.subscribers.clone(),
            &state.settings.asset,
            &state.settings.currency,
        );
        Self { state, dispatcher }
    }

    /// One iteration. A failed fetch changes nothing.
    pub async fn tick(&self) -> TickOutcome {
        let settings = &self.state.settings;

        let fetched = match timeout(settings.fetch_timeout, self.state.quotes.fetch_price()).await {
            Ok(result) => result,
            Err(_) => Err(QuoteError::Timeout),
        };

        let price = match fetched {
            Ok(price) => price,
            Err(err) => {
                prometheus::record_fetch_failure(err.kind());
                warn!(error = %err, kind = err.kind(), "price fetch failed, skipping tick");
                return TickOutcome::FetchFailed;
            }
        };

        prometheus::record_fetch_ok();
        prometheus::record_last_price(price);
        info!(price, "current price");

        let reference = self.state.prices.reference().await;
        let decision = threshold::evaluate(reference, price, settings.threshold);

        let outcome = match decision {
            Decision::Baseline => {
                info!(price, "baseline price set");
                TickOutcome::Baseline { price }
            }
            Decision::Hold { delta } => {
                debug!(price, delta, threshold = settings.threshold, "below threshold");
                TickOutcome::Held { price, delta }
            }
            Decision::Notify { delta } => {
                let report = self.dispatcher.notify_all(price, delta).await;
                prometheus::record_notification();
                info!(
                    price,
                    delta,
                    delivered = report.delivered.len(),
                    failed = report.failed.len(),
                    evicted = report.evicted.len(),
                    "price alert sent"
                );
                TickOutcome::Notified { price, delta, report }
            }
        };

        self.state.prices.record(price, decision.new_reference(price)).await;
        outcome
    }

    /// Ticks immediately, then once per `check_interval` after each iteration
    /// finishes, until `cancel` fires.
    ///
    /// A panicking iteration is logged and the loop carries on.
    pub async fn run(self, cancel: CancellationToken) {
        let interval = self.state.settings.check_interval;
        info!(
            interval_secs = interval.as_secs(),
            threshold = self.state.settings.threshold,
            "price monitor started"
        );

        let mut first = true;
        loop {
            if !first {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = sleep(interval) => {}
                }
            }
            first = false;

            let iteration = AssertUnwindSafe(self.tick()).catch_unwind();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = iteration => {
                    if let Err(panic) = result {
                        error!(panic = panic_message(&*panic), "monitor iteration panicked");
                    }
                }
            }
        }

        info!("price monitor stopped");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
