//! Reply builders for each command. Kept free of Telegram types so they can
//! be exercised directly.

use chrono::Local;
use teloxide::utils::command::BotCommands;
use tokio::time::timeout;
use tracing::{info, warn};

use super::commands::Command;
use crate::formatters::{display_asset, format_money, format_timestamp};
use crate::market_data::QuoteError;
use crate::state::{AppState, MonitorSettings, SubscriberId};

/// Applies the command's effect on the registry and returns the reply text.
pub async fn reply_for(command: Command, chat: SubscriberId, state: &AppState) -> String {
    match command {
        Command::Start => {
            if state.subscribers.add(chat) {
                info!(%chat, subscribers = state.subscribers.len(), "subscribed");
            }
            welcome_text(&state.settings)
        }
        Command::Price => price_reply(state).await,
        Command::Status => status_reply(state).await,
        Command::Stop => {
            if state.subscribers.remove(chat) {
                info!(%chat, subscribers = state.subscribers.len(), "unsubscribed");
            }
            format!(
                "❌ You have unsubscribed from {} price alerts.",
                display_asset(&state.settings.asset)
            )
        }
        Command::Help => help_text(),
    }
}

pub fn welcome_text(settings: &MonitorSettings) -> String {
    let asset = display_asset(&settings.asset);
    format!(
        "🚀 Welcome to the {asset} price alert bot!\n\n\
         📊 I will notify you every time {asset} moves by {} or more.\n\
         ⏰ The price is checked every {}.\n\n\
         Available commands:\n\
         /price - show the current price\n\
         /status - bot status\n\
         /stop - stop notifications",
        format_money(settings.threshold, &settings.currency),
        format_interval(settings.check_interval.as_secs()),
    )
}

pub fn help_text() -> String {
    Command::descriptions().to_string()
}

/// Always fetches a fresh quote rather than reusing the monitor's last price.
pub async fn price_reply(state: &AppState) -> String {
    let fetched = match timeout(state.settings.fetch_timeout, state.quotes.fetch_price()).await {
        Ok(result) => result,
        Err(_) => Err(QuoteError::Timeout),
    };

    match fetched {
        Ok(price) => format!(
            "💰 Current {} price: {}\n🕐 Time: {}",
            display_asset(&state.settings.asset),
            format_money(price, &state.settings.currency),
            format_timestamp(Local::now()),
        ),
        Err(err) => {
            warn!(error = %err, kind = err.kind(), "price command fetch failed");
            "❌ Could not fetch the current price. Please try again later.".to_string()
        }
    }
}

pub async fn status_reply(state: &AppState) -> String {
    let prices = state.prices.snapshot().await;
    let settings = &state.settings;
    let money = |value| format_money(value, &settings.currency);

    let mut text = String::from("📊 Bot status:\n\n");
    if let Some(last) = prices.last_seen {
        text.push_str(&format!("💰 Last price: {}\n", money(last)));
    }
    if let Some(reference) = prices.reference {
        text.push_str(&format!("🔔 Last notification: {}\n", money(reference)));
    }
    text.push_str(&format!("👥 Subscribers: {}\n", state.subscribers.len()));
    text.push_str(&format!(
        "⏱ Check interval: {}\n",
        format_interval(settings.check_interval.as_secs())
    ));
    text.push_str(&format!("💵 Alert threshold: {}", money(settings.threshold)));
    text
}

/// Whole minutes read as "5 min"; anything else falls back to seconds.
fn format_interval(secs: u64) -> String {
    if secs >= 60 && secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format!("{secs} s")
    }
}
