pub mod telegram;
pub mod traits;

use std::sync::Arc;

use chrono::{DateTime, Local};
use futures::future::join_all;
use tracing::{info, warn};

use crate::formatters::{display_asset, format_money, format_signed, format_timestamp};
use crate::market_data::Price;
use crate::metrics::prometheus;
use crate::state::{SubscriberId, SubscriberRegistry};
pub use traits::{DeliveryError, MessageSink};

/// Per-call tally of what happened to each recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<SubscriberId>,
    pub failed: Vec<SubscriberId>,
    pub evicted: Vec<SubscriberId>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len() + self.evicted.len()
    }
}

/// Fans one alert out to every current subscriber.
pub struct NotificationDispatcher {
    sink: Arc<dyn MessageSink>,
    subscribers: SubscriberRegistry,
    asset: String,
    currency: String,
}

impl NotificationDispatcher {
    pub fn new(
        sink: Arc<dyn MessageSink>,
        subscribers: SubscriberRegistry,
        asset: &str,
        currency: &str,
    ) -> Self {
        Self {
            sink,
            subscribers,
            asset: display_asset(asset),
            currency: currency.to_uppercase(),
        }
    }

    /// Sends the same alert text to every subscriber in a snapshot of the registry.
    ///
    /// A failed delivery never stops the others. Recipients that are gone for
    /// good are removed from the registry.
    pub async fn notify_all(&self, price: Price, delta: Price) -> DispatchReport {
        let recipients = self.subscribers.snapshot();
        if recipients.is_empty() {
            return DispatchReport::default();
        }

        let text = alert_text(&self.asset, &self.currency, price, delta, Local::now());

        let results = join_all(recipients.iter().map(|&recipient| {
            let text = text.as_str();
            async move { (recipient, self.sink.send_text(recipient, text).await) }
        }))
        .await;

        let mut report = DispatchReport::default();
        for (recipient, result) in results {
            match result {
                Ok(()) => {
                    prometheus::record_delivery("delivered");
                    report.delivered.push(recipient);
                }
                Err(err) if err.is_permanent() => {
                    self.subscribers.remove(recipient);
                    prometheus::record_delivery("evicted");
                    info!(%recipient, error = %err, "recipient unreachable, unsubscribed");
                    report.evicted.push(recipient);
                }
                Err(err) => {
                    prometheus::record_delivery("failed");
                    warn!(%recipient, error = %err, "failed to deliver alert");
                    report.failed.push(recipient);
                }
            }
        }

        report
    }
}

/// Builds the alert text. Direction is "up" only for a strictly positive delta.
pub fn alert_text(
    asset: &str,
    currency: &str,
    price: Price,
    delta: Price,
    at: DateTime<Local>,
) -> String {
    let (emoji, verb) = if delta > 0.0 {
        ("📈", "rose")
    } else {
        ("📉", "fell")
    };

    format!(
        "{emoji} {asset} {verb} by {}!\n\n\
         💰 Current price: {}\n\
         📊 Change: {} {currency}\n\
         🕐 Time: {}",
        format_money(delta.abs(), currency),
        format_money(price, currency),
        format_signed(delta),
        format_timestamp(at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use chrono::TimeZone;

    fn dispatcher(
        sink: Arc<RecordingSink>,
        subscribers: &SubscriberRegistry,
    ) -> NotificationDispatcher {
        NotificationDispatcher::new(sink, subscribers.clone(), "ethereum", "usd")
    }

    #[test]
    fn alert_text_for_a_rise() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let text = alert_text("Ethereum", "USD", 3060.0, 60.0, at);

        assert_eq!(
            text,
            "📈 Ethereum rose by $60.00!\n\n\
             💰 Current price: $3,060.00\n\
             📊 Change: +60.00 USD\n\
             🕐 Time: 12:30:00 01.05.2024"
        );
    }

    #[test]
    fn zero_or_negative_delta_reads_as_a_fall() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        let fall = alert_text("Ethereum", "USD", 2940.0, -60.0, at);
        assert!(fall.starts_with("📉 Ethereum fell by $60.00!"));
        assert!(fall.contains("Change: -60.00 USD"));

        let flat = alert_text("Ethereum", "USD", 3000.0, 0.0, at);
        assert!(flat.starts_with("📉"));
    }

    #[test]
    fn alert_text_uses_the_configured_currency() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let text = alert_text("Ethereum", "EUR", 2900.0, -100.0, at);

        assert!(text.starts_with("📉 Ethereum fell by €100.00!"), "{text}");
        assert!(text.contains("Current price: €2,900.00"));
        assert!(text.contains("Change: -100.00 EUR"));
        assert!(!text.contains('$'));
    }

    #[tokio::test]
    async fn empty_registry_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let subscribers = SubscriberRegistry::new();

        let report = dispatcher(sink.clone(), &subscribers).notify_all(3060.0, 60.0).await;

        assert_eq!(report, DispatchReport::default());
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn every_subscriber_gets_the_same_text() {
        let sink = Arc::new(RecordingSink::default());
        let subscribers = SubscriberRegistry::new();
        subscribers.add(SubscriberId(1));
        subscribers.add(SubscriberId(2));

        let report = dispatcher(sink.clone(), &subscribers).notify_all(3060.0, 60.0).await;

        assert_eq!(report.delivered.len(), 2);
        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, sent[1].1);
        assert!(sent[0].1.contains("Ethereum rose by $60.00"));
    }

    #[tokio::test]
    async fn transient_failure_is_isolated_and_keeps_subscription() {
        let sink = Arc::new(RecordingSink::default());
        sink.fail_transiently(SubscriberId(1));
        let subscribers = SubscriberRegistry::new();
        subscribers.add(SubscriberId(1));
        subscribers.add(SubscriberId(2));

        let report = dispatcher(sink.clone(), &subscribers).notify_all(2900.0, -100.0).await;

        assert_eq!(report.failed, vec![SubscriberId(1)]);
        assert_eq!(report.delivered, vec![SubscriberId(2)]);
        assert!(report.evicted.is_empty());
        assert!(subscribers.contains(SubscriberId(1)));
        assert_eq!(sink.recipients(), vec![SubscriberId(2)]);
    }

    #[tokio::test]
    async fn blocked_recipient_is_evicted() {
        let sink = Arc::new(RecordingSink::default());
        sink.block(SubscriberId(1));
        let subscribers = SubscriberRegistry::new();
        subscribers.add(SubscriberId(1));
        subscribers.add(SubscriberId(2));

        let report = dispatcher(sink.clone(), &subscribers).notify_all(3100.0, 100.0).await;

        assert_eq!(report.evicted, vec![SubscriberId(1)]);
        assert_eq!(report.attempted(), 2);
        assert!(!subscribers.contains(SubscriberId(1)));
        assert!(subscribers.contains(SubscriberId(2)));
    }
}
