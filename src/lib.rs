//! Telegram bot that polls a price-quote API and alerts subscribers when the
//! tracked asset moves by at least a threshold since the last alert.

pub mod bot;
pub mod config;
pub mod formatters;
pub mod market_data;
pub mod metrics;
pub mod monitor;
pub mod notify;
pub mod state;

#[cfg(test)]
mod testing;
