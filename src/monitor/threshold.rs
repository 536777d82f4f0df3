use crate::market_data::Price;

/// What a freshly observed price means relative to the current reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// No reference yet; the observed price becomes the baseline. No alert.
    Baseline,
    /// Moved less than the threshold. Reference stays put.
    Hold { delta: Price },
    /// Moved at least the threshold. Alert, then move the reference.
    Notify { delta: Price },
}

impl Decision {
    /// The reference to store after acting on this decision, if it changes.
    pub fn new_reference(&self, observed: Price) -> Option<Price> {
        match self {
            Self::Baseline | Self::Notify { .. } => Some(observed),
            Self::Hold { .. } => None,
        }
    }
}

/// A move of exactly `threshold` counts.
pub fn evaluate(reference: Option<Price>, observed: Price, threshold: f64) -> Decision {
    let Some(reference) = reference else {
        return Decision::Baseline;
    };

    let delta = observed - reference;
    if delta.abs() >= threshold {
        Decision::Notify { delta }
    } else {
        Decision::Hold { delta }
    }
}
