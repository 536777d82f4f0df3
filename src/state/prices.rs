use tokio::sync::RwLock;

use crate::market_data::Price;

/// Prices the monitor has observed. Both fields are unset until the first
/// successful fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceSnapshot {
    pub last_seen: Option<Price>,
    /// Baseline for the next threshold comparison. Moves only when an alert goes out
    /// (or on the very first observation).
    pub reference: Option<Price>,
}

/// Guards the monitor's two price variables together.
///
/// Only the monitor writes; `/status` reads and may see the previous tick.
#[derive(Debug, Default)]
pub struct PriceTracker {
    inner: RwLock<PriceSnapshot>,
}

impl PriceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> PriceSnapshot {
        *self.inner.read().await
    }

    pub async fn reference(&self) -> Option<Price> {
        self.inner.read().await.reference
    }

    /// Records an observed price and, when given, a new reference in one write.
    pub async fn record(&self, observed: Price, new_reference: Option<Price>) {
        let mut guard = self.inner.write().await;
        guard.last_seen = Some(observed);
        if let Some(reference) = new_reference {
            guard.reference = Some(reference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_unset() {
        let tracker = PriceTracker::new();
        assert_eq!(tracker.snapshot().await, PriceSnapshot::default());
        assert_eq!(tracker.reference().await, None);
    }

    #[tokio::test]
    async fn record_keeps_reference_unless_replaced() {
        let tracker = PriceTracker::new();

        tracker.record(3000.0, Some(3000.0)).await;
        tracker.record(3010.0, None).await;

        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.last_seen, Some(3010.0));
        assert_eq!(snapshot.reference, Some(3000.0));
    }
}
