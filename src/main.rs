// =============================================================================
// MarketDeck — Main Entry Point
// =============================================================================
//
// One command starts the whole dashboard: an HTTP server that serves the
// embedded page at `/` and the JSON pipeline under `/api/v1/`. Refresh is
// client-driven polling; there are no background tasks.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analytics;
mod api;
mod app_state;
mod indicators;
mod market;
mod settings;
mod types;
mod view;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::analytics::UsageLog;
use crate::app_state::AppState;
use crate::market::client::{MarketClient, DEFAULT_BASE_URL};
use crate::settings::DashboardSettings;

/// Default bind address; override with `DASHBOARD_BIND_ADDR`.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Settings and analytics files, relative to the working directory.
const SETTINGS_PATH: &str = "dashboard_settings.json";
const ANALYTICS_PATH: &str = "analytics_events.jsonl";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MarketDeck starting up");

    let mut dashboard_settings = DashboardSettings::load(SETTINGS_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "failed to load settings, using defaults");
        DashboardSettings::default()
    });

    // Override watchlist from env if available.
    if let Ok(symbols) = std::env::var("DASHBOARD_SYMBOLS") {
        let watchlist: Vec<String> = symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !watchlist.is_empty() {
            dashboard_settings.watchlist = watchlist;
        }
    }

    info!(
        watchlist = ?dashboard_settings.watchlist,
        range = %dashboard_settings.default_range,
        interval = %dashboard_settings.default_interval,
        "dashboard settings ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let upstream_url =
        std::env::var("DASHBOARD_UPSTREAM_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let market = MarketClient::new(upstream_url);
    info!(upstream = market.base_url(), "market data client ready");

    let analytics = UsageLog::open(ANALYTICS_PATH);
    let state = Arc::new(AppState::new(
        dashboard_settings,
        SETTINGS_PATH,
        market,
        analytics,
    ));

    // ── 3. Serve ─────────────────────────────────────────────────────────
    let bind_addr =
        std::env::var("DASHBOARD_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "dashboard listening — open http://{bind_addr}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    warn!("shutdown signal received — stopping gracefully");
    if let Err(e) = state.settings.read().save(SETTINGS_PATH) {
        error!(error = %e, "failed to save settings on shutdown");
    }

    info!("MarketDeck shut down complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
