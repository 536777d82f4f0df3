use thiserror::Error;

/// Quote-currency units per unit of the tracked asset. Always finite and non-negative.
pub type Price = f64;

/// Why a quote could not be produced. Callers treat every variant as "no price this tick"
/// but log them apart.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote API returned HTTP {0}")]
    Status(u16),

    #[error("quote request timed out")]
    Timeout,

    #[error("quote request failed: {0}")]
    Transport(String),

    #[error("quote response is not valid JSON: {0}")]
    Decode(String),

    #[error("quote response has no {asset}.{currency} field")]
    MissingField { asset: String, currency: String },

    #[error("quote value is not a number: {0}")]
    NotNumeric(String),

    #[error("quote value {0} is not a usable price")]
    InvalidPrice(f64),
}

impl QuoteError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::MissingField { .. } => "missing_field",
            Self::NotNumeric(_) => "not_numeric",
            Self::InvalidPrice(_) => "invalid_price",
        }
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
