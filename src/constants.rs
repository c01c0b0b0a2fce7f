//! Constants for the BlockLens dashboard SDK
//!
//! Everything that is not read from the environment lives here. The only
//! runtime configuration is the optional API key, base URL and timeout read by
//! [`GatewayConfig::from_env`](crate::config::GatewayConfig::from_env).

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Endpoint for paged market listings
pub const COINS_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Parent path of per-coin endpoints (`/coins/{id}/market_chart`)
pub const COINS_ENDPOINT: &str = "/coins";

/// Last path segment of the price history endpoint
pub const MARKET_CHART_SEGMENT: &str = "market_chart";

/// Endpoint for search autocomplete
pub const SEARCH_ENDPOINT: &str = "/search";

/// Endpoint for simple spot price lookups
pub const SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Endpoint for BTC-denominated exchange rates
pub const EXCHANGE_RATES_ENDPOINT: &str = "/exchange_rates";

/// Query parameter carrying the demo API key
pub const API_KEY_PARAM: &str = "x_cg_demo_api_key";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "COINGECKO_API_KEY";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "COINGECKO_API_URL";

/// Environment variable overriding the request timeout (seconds)
pub const TIMEOUT_ENV: &str = "COINGECKO_TIMEOUT_SECS";

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "blocklens-sdk/0.1.0";

/// Coins shown per page in the market list
pub const DEFAULT_PER_PAGE: u32 = 8;

/// Assumed total number of listed coins. The API does not report a total,
/// so pagination works against this fixed bound.
pub const TOTAL_ITEMS: u64 = 350;

/// Pages shown without ellipsis compression
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Number of coins offered in the chart coin picker
pub const CHART_COIN_LIST_SIZE: u32 = 50;

/// Coin shown by the price chart until one is selected
pub const DEFAULT_CHART_COIN: &str = "bitcoin";

/// Delay before a typed search query is dispatched (in milliseconds)
pub const SEARCH_DEBOUNCE_MS: u64 = 1000;

/// Number of listed coins the sparkline board covers
pub const SPARKLINE_COIN_LIMIT: usize = 10;

/// Coins in the portfolio market-cap breakdown, with their display labels
pub const PORTFOLIO_COINS: &[(&str, &str)] = &[
    ("bitcoin", "Bitcoin"),
    ("ethereum", "Ethereum"),
    ("tether", "Tether"),
];

/// Capacity of the dashboard event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Message shown when a search returns nothing
pub const SEARCH_EMPTY_MESSAGE: &str = "No cryptocurrencies found";
