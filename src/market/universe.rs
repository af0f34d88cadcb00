// =============================================================================
// Symbol universe for the Market Overview page
// =============================================================================
//
// Static tables of the symbols the overview composes: major index tickers,
// sector ETFs, the mover-scan universe, and the sector heatmap membership.
// The economic indicator table carries demonstration values; wiring a real
// macro-data source is future work.
// =============================================================================

/// Major market indices shown as headline quotes: (upstream symbol, name).
pub const MARKET_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
    ("^RUT", "Russell 2000"),
    ("^FTSE", "FTSE 100"),
    ("^N225", "Nikkei 225"),
];

/// Indices used for the normalized comparison chart (US majors only).
pub const COMPARISON_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
    ("^RUT", "Russell 2000"),
];

/// Sector ETFs proxying sector performance: (ETF symbol, sector name).
pub const SECTOR_ETFS: &[(&str, &str)] = &[
    ("XLF", "Financials"),
    ("XLK", "Technology"),
    ("XLV", "Healthcare"),
    ("XLE", "Energy"),
    ("XLI", "Industrials"),
    ("XLY", "Consumer Discretionary"),
    ("XLP", "Consumer Staples"),
    ("XLB", "Materials"),
    ("XLU", "Utilities"),
    ("XLRE", "Real Estate"),
    ("XLC", "Communication Services"),
];

/// Liquid large-caps scanned for the top gainers / losers widget.
pub const MOVER_UNIVERSE: &[&str] = &[
    // Tech
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "INTC", "AMD", "CRM",
    // Finance
    "JPM", "BAC", "WFC", "C", "GS", "MS", "AXP", "V", "MA", "PYPL",
    // Healthcare
    "JNJ", "PFE", "UNH", "ABBV", "MRK", "LLY", "AMGN", "BMY", "TMO", "ABT",
    // Consumer
    "PG", "KO", "PEP", "WMT", "HD", "MCD", "NKE", "SBUX", "DIS", "NFLX",
];

/// Sector membership for the heatmap, a few representative large-caps per
/// sector. Each overview request fetches these sequentially, so the table is
/// kept deliberately small.
pub const HEATMAP_SECTORS: &[(&str, &[&str])] = &[
    ("Technology", &["AAPL", "MSFT", "NVDA", "AMD", "CRM"]),
    ("Communication", &["GOOGL", "META", "NFLX", "DIS", "VZ"]),
    ("Consumer Discretionary", &["AMZN", "TSLA", "HD", "MCD", "NKE"]),
    ("Consumer Staples", &["PG", "KO", "PEP", "WMT", "COST"]),
    ("Healthcare", &["JNJ", "UNH", "PFE", "ABBV", "MRK"]),
    ("Financials", &["JPM", "BAC", "WFC", "GS", "V"]),
    ("Industrials", &["HON", "UPS", "BA", "CAT", "GE"]),
    ("Energy", &["XOM", "CVX", "COP", "EOG", "SLB"]),
    ("Utilities", &["NEE", "DUK", "SO", "D", "AEP"]),
    ("Real Estate", &["AMT", "PLD", "CCI", "PSA", "O"]),
];

/// Headline economic indicators: (name, display value).
///
/// TODO: replace with a FRED fetch once an API key story exists; until then
/// these are static demonstration values, labelled as such in the UI.
pub const ECONOMIC_INDICATORS: &[(&str, &str)] = &[
    ("10-Year Treasury Yield", "3.85%"),
    ("Fed Funds Rate", "5.25-5.50%"),
    ("US Inflation Rate (CPI)", "3.2%"),
    ("US Unemployment Rate", "3.9%"),
    ("US GDP Growth", "2.1%"),
    ("VIX (Volatility Index)", "12.38"),
];
