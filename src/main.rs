use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use price_alert_bot::bot::run_bot;
use price_alert_bot::config::Config;
use price_alert_bot::market_data::adapters::coingecko::CoinGeckoClient;
use price_alert_bot::metrics::prometheus;
use price_alert_bot::monitor::PriceMonitor;
use price_alert_bot::notify::telegram::TelegramSink;
use price_alert_bot::state::{AppState, MonitorSettings};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so RUST_LOG from it reaches the subscriber.
    // dotenvy doesn't override already-set env vars.
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration, exiting");
            std::process::exit(1);
        }
    };

    info!(
        interval_secs = config.check_interval.as_secs(),
        threshold = config.price_threshold,
        asset = %config.quote.asset_id,
        currency = %config.quote.currency,
        "price-alert-bot starting"
    );

    if let Some(port) = config.metrics_port {
        prometheus::init_metrics_server(port).context("failed to start Prometheus exporter")?;
        info!(port, "metrics exporter listening");
    }

    let quotes = CoinGeckoClient::new(&config.quote).context("failed to build HTTP client")?;
    let settings = MonitorSettings {
        check_interval: config.check_interval,
        fetch_timeout: config.quote.timeout,
        threshold: config.price_threshold,
        asset: config.quote.asset_id.clone(),
        currency: config.quote.currency.clone(),
    };
    let state = Arc::new(AppState::new(Arc::new(quotes), settings));

    let bot = Bot::new(&config.bot_token);
    let sink = Arc::new(TelegramSink::new(bot.clone()));

    let cancel = CancellationToken::new();
    let monitor = PriceMonitor::new(Arc::clone(&state), sink);
    let monitor_handle = tokio::spawn(monitor.run(cancel.clone()));

    // Returns once Ctrl-C stops the dispatcher.
    run_bot(bot, Arc::clone(&state)).await;

    info!("shutting down");
    cancel.cancel();
    if let Err(err) = monitor_handle.await {
        warn!(error = %err, "price monitor task panicked");
    }

    // Last owner of the quote client; its connection pool closes here.
    drop(state);
    info!("price-alert-bot stopped");

    Ok(())
}
