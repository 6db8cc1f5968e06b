//! Chipbot Binary
//!
//! Telegram-facing mini-casino: long-polls for updates, settles wagers
//! against the in-memory ledger, and exposes health and metrics on a
//! side listener.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use chipbot::chat::{ChatHandler, SupportRelay};
use chipbot::config::BotConfig;
use chipbot::metrics::CasinoMetrics;
use chipbot::ops::{self, OpsState};
use chipbot::telegram::{TelegramClient, TelegramSink, UpdatePoller};
use chipbot::Casino;

#[derive(Parser, Debug)]
#[command(name = "chipbot")]
#[command(about = "Chat-operated mini-casino", long_about = None)]
struct Args {
    /// Ops listener for /health and /metrics
    #[arg(long, default_value = "127.0.0.1:9464")]
    ops_addr: SocketAddr,

    /// Disable the ops listener entirely
    #[arg(long)]
    no_ops: bool,

    /// Long-poll timeout in seconds
    #[arg(long, default_value = "30")]
    poll_timeout: u64,

    /// Delay between the wager ack and the outcome, in milliseconds
    #[arg(long, default_value = "1200")]
    suspense_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chipbot=info,tower_http=warn".into()),
        )
        .init();

    // A missing BOT_TOKEN is fatal; everything else has a default.
    let mut config = BotConfig::from_env()?;
    config.poll_timeout_secs = args.poll_timeout;
    config.suspense_delay_ms = args.suspense_ms;
    if !args.no_ops {
        config.ops_addr = Some(args.ops_addr);
    }

    info!("🚀 Starting Chipbot v{}", env!("CARGO_PKG_VERSION"));
    info!("   Initial balance: {} chips", config.rules.initial_balance);
    info!(
        "   Table limits: {} to {} chips",
        config.rules.min_bet, config.rules.max_bet
    );
    info!(
        "   Daily bonus: {} to {} chips every {}h",
        config.rules.daily_bonus_min, config.rules.daily_bonus_max, config.rules.daily_cooldown_hours
    );
    match config.support_chat_id {
        Some(chat_id) => info!("   Support channel: {chat_id}"),
        None => warn!("⚠️  SUPPORT_CHAT_ID not set; /support will be unavailable"),
    }

    let casino = Arc::new(Casino::with_defaults(config.rules.clone()));
    let metrics = Arc::new(CasinoMetrics::new());

    if let Some(ops_addr) = config.ops_addr {
        let state = OpsState::new(Arc::clone(&casino), Arc::clone(&metrics));
        tokio::spawn(async move {
            if let Err(err) = ops::serve(ops_addr, state, shutdown_signal()).await {
                warn!("⚠️ ops server exited: {err}");
            }
        });
    }

    let client = Arc::new(TelegramClient::new(&config.token)?);
    let sink = Arc::new(TelegramSink::new(Arc::clone(&client)));
    let relay = SupportRelay::new(config.support_chat_id);
    let handler = Arc::new(ChatHandler::new(
        Arc::clone(&casino),
        sink,
        relay,
        Arc::clone(&metrics),
        config.suspense_delay(),
    ));

    info!("✅ Casino open for business");

    let poller = UpdatePoller::new(client, handler, config.poll_timeout());
    poller.run(shutdown_signal()).await?;

    info!("🛑 Chipbot stopped gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
