// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All JSON endpoints live under `/api/v1/`; `/` serves the embedded page.
// Each request executes the full pipeline synchronously:
//
//   fetch (shim, cached) → compute (indicator engine) → assemble (view)
//
// Fetch failures map to status codes at this boundary only: SymbolNotFound
// → 404, RateLimited → 429, transient/malformed → 502. Every error becomes
// a user-visible `{ "error": ... }` body; nothing here is fatal.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analytics::UsageKind;
use crate::app_state::AppState;
use crate::indicators::{self, summary};
use crate::market::{universe, FetchError, PriceSeries};
use crate::settings::IndicatorToggles;
use crate::types::{Interval, Range, Theme};
use crate::view::{charts, overview};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Page ────────────────────────────────────────────────────
        .route("/", get(index_page))
        // ── Meta ────────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/ranges", get(ranges))
        // ── Pipeline ────────────────────────────────────────────────
        .route("/api/v1/dashboard/:symbol", get(dashboard))
        .route("/api/v1/quote/:symbol", get(quote))
        .route("/api/v1/search", get(search))
        .route("/api/v1/overview", get(market_overview))
        // ── Settings ────────────────────────────────────────────────
        .route("/api/v1/settings", get(get_settings))
        .route("/api/v1/settings", put(update_settings))
        // ── Analytics ───────────────────────────────────────────────
        .route("/api/v1/analytics", get(analytics_summary))
        .route("/api/v1/analytics", delete(analytics_clear))
        .route("/api/v1/analytics/events", get(analytics_events))
        .route("/api/v1/analytics/events", post(analytics_record))
        // ── Middleware & State ──────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
}

/// Map the shim's failure taxonomy onto HTTP statuses.
fn fetch_error_response(err: FetchError) -> ApiError {
    let status = match &err {
        FetchError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
        FetchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FetchError::Transient(_) | FetchError::Malformed(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(serde_json::json!({
            "error": err.to_string(),
            "retryable": err.is_retryable(),
        })),
    )
}

// =============================================================================
// Page
// =============================================================================

async fn index_page() -> impl IntoResponse {
    Html(include_str!("../../static/index.html"))
}

// =============================================================================
// Meta
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds().max(0);
    Json(serde_json::json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs,
        "state_version": state.current_state_version(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

/// Ranges and their valid intervals, for the UI selectors.
async fn ranges() -> impl IntoResponse {
    let rows: Vec<serde_json::Value> = Range::all()
        .iter()
        .map(|r| {
            serde_json::json!({
                "range": r.as_str(),
                "intervals": r.valid_intervals().iter().map(Interval::as_str).collect::<Vec<_>>(),
                "default_interval": r.default_interval().as_str(),
            })
        })
        .collect();
    Json(rows)
}

// =============================================================================
// Stock dashboard pipeline
// =============================================================================

#[derive(Debug, Deserialize)]
struct StockQuery {
    range: Option<Range>,
    interval: Option<Interval>,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(bad_request("symbol must not be empty"));
    }

    // Settings snapshot for this render cycle.
    let (default_range, default_interval, toggles) = {
        let settings = state.settings.read();
        (
            settings.default_range,
            settings.default_interval,
            settings.indicators,
        )
    };

    let range = query.range.unwrap_or(default_range);
    let interval = query.interval.unwrap_or(if range.allows(default_interval) {
        default_interval
    } else {
        range.default_interval()
    });

    if !range.allows(interval) {
        return Err(bad_request(format!(
            "interval '{interval}' is not valid for range '{range}' (valid: {})",
            range
                .valid_intervals()
                .iter()
                .map(Interval::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    state
        .analytics
        .record(UsageKind::Fetch, format!("{symbol} {range}/{interval}"));

    let series = state
        .fetch_cached(&symbol, range, interval)
        .await
        .map_err(fetch_error_response)?;

    let set = indicators::compute(&series, &toggles);
    let mut stats = summary::summarize(&series);

    // 52-week range comes from a separate one-year daily fetch; best-effort.
    if let Some(stats) = stats.as_mut() {
        match state
            .fetch_cached(&symbol, Range::OneYear, Interval::OneDay)
            .await
        {
            Ok(yearly) => {
                if let Some((high, low)) = summary::fifty_two_week_range(&yearly) {
                    stats.fifty_two_week_high = Some(high);
                    stats.fifty_two_week_low = Some(low);
                }
            }
            Err(e) => warn!(%symbol, error = %e, "52-week range unavailable"),
        }
    }

    Ok(Json(charts::stock_dashboard(&series, &set, stats, range)))
}

/// Compact quote for the watchlist strip: latest price and day change from a
/// few daily bars.
async fn quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(bad_request("symbol must not be empty"));
    }

    let series = state
        .fetch_cached(&symbol, Range::FiveDays, Interval::OneDay)
        .await
        .map_err(fetch_error_response)?;

    let stats = summary::summarize(&series)
        .ok_or_else(|| fetch_error_response(FetchError::SymbolNotFound(symbol.clone())))?;

    Ok(Json(serde_json::json!({
        "symbol": series.symbol,
        "price": stats.latest_price,
        "change": stats.change,
        "change_pct": stats.change_pct,
        "volume": stats.latest_volume,
    })))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

/// Symbol validation: a probe fetch of a short daily range through the shim.
/// An unknown symbol is a negative answer, not an error status.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = query.q.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    state.analytics.record(UsageKind::SymbolSearch, symbol.clone());

    match state
        .fetch_cached(&symbol, Range::FiveDays, Interval::OneDay)
        .await
    {
        Ok(series) => Ok(Json(serde_json::json!({
            "symbol": series.symbol,
            "valid": true,
        }))),
        Err(FetchError::SymbolNotFound(_)) => Ok(Json(serde_json::json!({
            "symbol": symbol,
            "valid": false,
        }))),
        Err(e) => Err(fetch_error_response(e)),
    }
}

// =============================================================================
// Market overview pipeline
// =============================================================================

/// Fetch one series per (tag, symbol), skipping failures with a warning.
/// The overview renders whatever survived; a single bad symbol never blanks
/// the page.
async fn fetch_tagged(
    state: &AppState,
    symbols: &[(&'static str, &str)],
    range: Range,
    interval: Interval,
) -> Vec<(&'static str, PriceSeries)> {
    let mut out = Vec::with_capacity(symbols.len());
    for (tag, symbol) in symbols {
        match state.fetch_cached(symbol, range, interval).await {
            Ok(series) => out.push((*tag, series)),
            Err(e) => warn!(symbol, error = %e, "skipping overview symbol"),
        }
    }
    out
}

#[derive(Debug, Deserialize)]
struct OverviewQuery {
    /// Lookback for the comparison chart and sector bars; defaults below.
    range: Option<Range>,
}

/// Daily bars when the range permits them, else the range's default width.
fn daily_or_default(range: Range) -> Interval {
    if range.allows(Interval::OneDay) {
        Interval::OneDay
    } else {
        range.default_interval()
    }
}

async fn market_overview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OverviewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Headline index quotes: a few daily bars, last close vs previous close.
    let quote_symbols: Vec<(&'static str, &str)> = universe::MARKET_INDICES
        .iter()
        .map(|(symbol, name)| (*name, *symbol))
        .collect();
    let indices =
        fetch_tagged(&state, &quote_symbols, Range::FiveDays, Interval::OneDay).await;

    // Comparison chart: normalized closes over the requested range.
    let cmp_range = query.range.unwrap_or(Range::SixMonths);
    let cmp_symbols: Vec<(&'static str, &str)> = universe::COMPARISON_INDICES
        .iter()
        .map(|(symbol, name)| (*name, *symbol))
        .collect();
    let cmp = fetch_tagged(&state, &cmp_symbols, cmp_range, daily_or_default(cmp_range)).await;

    // Sector ETFs: move over the requested range (default five days).
    let sector_range = query.range.unwrap_or(Range::FiveDays);
    let sector_interval = daily_or_default(sector_range);
    let mut sector_fetched = Vec::with_capacity(universe::SECTOR_ETFS.len());
    for (etf, sector) in universe::SECTOR_ETFS {
        match state.fetch_cached(etf, sector_range, sector_interval).await {
            Ok(series) => sector_fetched.push((*etf, *sector, series)),
            Err(e) => warn!(symbol = etf, error = %e, "skipping sector ETF"),
        }
    }

    // Movers: intraday session move across the scan universe.
    let session_interval = Range::OneDay.default_interval();
    let mut mover_fetched = Vec::with_capacity(universe::MOVER_UNIVERSE.len());
    for symbol in universe::MOVER_UNIVERSE {
        match state
            .fetch_cached(symbol, Range::OneDay, session_interval)
            .await
        {
            Ok(series) => mover_fetched.push(series),
            Err(e) => warn!(symbol, error = %e, "skipping mover symbol"),
        }
    }

    // Heatmap: session move per sector member.
    let heatmap_symbols: Vec<(&'static str, &str)> = universe::HEATMAP_SECTORS
        .iter()
        .flat_map(|(sector, members)| members.iter().map(move |m| (*sector, *m)))
        .collect();
    let heat = fetch_tagged(&state, &heatmap_symbols, Range::OneDay, session_interval).await;

    let view = overview::OverviewView {
        indices: overview::index_quotes(&indices),
        comparison: overview::comparison(&cmp),
        sectors: overview::sector_performance(&sector_fetched),
        movers: overview::movers(&mover_fetched),
        heatmap: overview::heatmap(&heat),
        economic: overview::economic_indicators(),
    };

    Ok(Json(view))
}

// =============================================================================
// Settings
// =============================================================================

async fn get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.settings.read().clone())
}

#[derive(Debug, Deserialize)]
struct SettingsUpdate {
    #[serde(default)]
    watchlist: Option<Vec<String>>,
    #[serde(default)]
    default_range: Option<Range>,
    #[serde(default)]
    default_interval: Option<Interval>,
    #[serde(default)]
    auto_refresh: Option<bool>,
    #[serde(default)]
    refresh_interval_secs: Option<u64>,
    #[serde(default)]
    theme: Option<Theme>,
    #[serde(default)]
    indicators: Option<IndicatorToggles>,
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let mut changes = Vec::new();

    let updated = {
        let mut settings = state.settings.write();

        if let Some(watchlist) = update.watchlist {
            let watchlist: Vec<String> = watchlist
                .into_iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if watchlist.is_empty() {
                return Err(bad_request("watchlist must contain at least one symbol"));
            }
            if settings.watchlist != watchlist {
                changes.push(format!("watchlist: {:?}", watchlist));
                settings.watchlist = watchlist;
            }
        }
        if let Some(range) = update.default_range {
            if settings.default_range != range {
                changes.push(format!("default_range: {range}"));
                settings.default_range = range;
            }
        }
        if let Some(interval) = update.default_interval {
            if settings.default_interval != interval {
                changes.push(format!("default_interval: {interval}"));
                settings.default_interval = interval;
            }
        }
        if let Some(auto) = update.auto_refresh {
            if settings.auto_refresh != auto {
                changes.push(format!("auto_refresh: {auto}"));
                settings.auto_refresh = auto;
            }
        }
        if let Some(secs) = update.refresh_interval_secs {
            if settings.refresh_interval_secs != secs {
                changes.push(format!("refresh_interval_secs: {secs}"));
                settings.refresh_interval_secs = secs;
            }
        }
        if let Some(theme) = update.theme {
            if settings.theme != theme {
                changes.push(format!("theme: {theme}"));
                settings.theme = theme;
            }
        }
        if let Some(toggles) = update.indicators {
            if settings.indicators != toggles {
                changes.push("indicators".to_string());
                settings.indicators = toggles;
            }
        }

        settings.clamp_refresh();
        settings.clone()
    };

    if !changes.is_empty() {
        info!(changes = ?changes, "settings updated");
        state
            .analytics
            .record(UsageKind::SettingsChange, changes.join(", "));

        // Save to disk (best-effort).
        if let Err(e) = updated.save(&state.settings_path) {
            warn!(error = %e, "failed to save settings to disk");
        }

        state.increment_version();
    }

    Ok(Json(serde_json::json!({
        "settings": updated,
        "changes": changes,
    })))
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Deserialize)]
struct EventsQuery {
    limit: Option<usize>,
}

async fn analytics_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(500);
    Json(state.analytics.recent(limit))
}

#[derive(Debug, Deserialize)]
struct EventRequest {
    kind: UsageKind,
    #[serde(default)]
    detail: String,
}

async fn analytics_record(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EventRequest>,
) -> impl IntoResponse {
    let event = state.analytics.record(req.kind, req.detail);
    (StatusCode::CREATED, Json(event))
}

async fn analytics_clear(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dropped = state.analytics.len();
    state.analytics.clear();
    info!(dropped, "analytics log cleared");
    Json(serde_json::json!({ "dropped": dropped }))
}

async fn analytics_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.analytics.summary())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::UsageLog;
    use crate::market::client::MarketClient;
    use crate::settings::DashboardSettings;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// Router over temp files and an unroutable upstream: any handler that
    /// touched the network would fail loudly.
    fn test_router() -> Router {
        let tmp = std::env::temp_dir();
        let state = Arc::new(AppState::new(
            DashboardSettings::default(),
            tmp.join(format!("marketdeck-rest-{}.json", Uuid::new_v4())),
            MarketClient::new("http://127.0.0.1:1"),
            UsageLog::open(tmp.join(format!("marketdeck-rest-{}.jsonl", Uuid::new_v4()))),
        ));
        router(state)
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_responds_without_network() {
        let app = test_router();
        let resp = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert!(body["state_version"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn index_page_is_html() {
        let app = test_router();
        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let ct = resp.headers()["content-type"].to_str().unwrap();
        assert!(ct.starts_with("text/html"));
    }

    #[tokio::test]
    async fn ranges_lists_valid_intervals() {
        let app = test_router();
        let resp = app
            .oneshot(Request::get("/api/v1/ranges").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(resp).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), Range::all().len());
        assert_eq!(rows[0]["range"], "1d");
        assert!(rows[0]["intervals"].as_array().unwrap().iter().any(|i| i == "5m"));
    }

    #[tokio::test]
    async fn invalid_interval_is_rejected_before_fetching() {
        let app = test_router();
        let resp = app
            .oneshot(
                Request::get("/api/v1/dashboard/AAPL?range=1y&interval=1m")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("not valid"));
    }

    #[tokio::test]
    async fn unreachable_upstream_maps_to_bad_gateway() {
        let app = test_router();
        let resp = app
            .oneshot(
                Request::get("/api/v1/dashboard/AAPL?range=1mo&interval=1d")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(resp).await;
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn search_rejects_empty_query() {
        let app = test_router();
        let resp = app
            .oneshot(
                Request::get("/api/v1/search?q=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn quote_maps_upstream_failure() {
        let app = test_router();
        let resp = app
            .oneshot(
                Request::get("/api/v1/quote/AAPL")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn settings_update_roundtrip() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(
                Request::put("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{ "theme": "light", "refresh_interval_secs": 1 }"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["settings"]["theme"], "light");
        // Out-of-bounds refresh interval is clamped, not rejected.
        assert_eq!(body["settings"]["refresh_interval_secs"], 5);
        assert!(!body["changes"].as_array().unwrap().is_empty());

        let resp = app
            .oneshot(Request::get("/api/v1/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["theme"], "light");
    }

    #[tokio::test]
    async fn empty_watchlist_is_rejected() {
        let app = test_router();
        let resp = app
            .oneshot(
                Request::put("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{ "watchlist": ["  "] }"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analytics_record_and_summarize() {
        let app = test_router();

        let resp = app
            .clone()
            .oneshot(
                Request::post("/api/v1/analytics/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{ "kind": "page_view", "detail": "dashboard" }"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .clone()
            .oneshot(
                Request::get("/api/v1/analytics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["total_events"], 1);
        assert_eq!(body["page_views"]["dashboard"], 1);

        let resp = app
            .oneshot(
                Request::delete("/api/v1/analytics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["dropped"], 1);
    }
}
