pub mod adapters;
pub mod traits;
pub mod types;

pub use traits::PriceSource;
pub use types::{Price, QuoteError};
