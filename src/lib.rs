//! # BlockLens Market Dashboard SDK
//!
//! Data layer for a cryptocurrency analytics dashboard: market listings,
//! price charts, search, pagination, a currency converter and the theme and
//! layout toggles, all backed by the CoinGecko REST API.
//!
//! ## Usage
//!
//! The dashboard uses a singleton pattern for easy access throughout the application:
//!
//! ```no_run
//! use blocklens_sdk::{MarketDashboard, SortOrder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Get the global dashboard; the first call loads the market list
//! let dashboard = MarketDashboard::global().await?;
//!
//! // Change a fetch parameter; the list is re-fetched right away
//! dashboard.set_sort_by(SortOrder::VolumeDesc).await;
//!
//! if let Some(coins) = dashboard.coins().await.data() {
//!     for coin in coins {
//!         println!("{}: {:?}", coin.symbol, coin.current_price);
//!     }
//! }
//!
//! if let Some(pages) = dashboard.pagination_view().await {
//!     println!("{}", pages.caption());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Widgets that fetch on their own (chart, converter, portfolio, sparklines)
//! take the dashboard's gateway:
//!
//! ```no_run
//! use blocklens_sdk::{widgets::CurrencyConverter, MarketDashboard};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = MarketDashboard::from_env()?;
//! let mut converter = CurrencyConverter::new(dashboard.gateway());
//! converter.refresh_rates().await;
//! converter.set_amount(1.0);
//! converter.convert()?;
//! println!("1 BTC = {}", converter.result_label());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod format;
pub mod gateway;
pub mod gateways;
pub mod loadable;
pub mod metrics;
pub mod pagination;
pub mod state;
pub mod types;
pub mod widgets;

// Re-export commonly used types
pub use config::GatewayConfig;
pub use dashboard::MarketDashboard;
pub use error::{ConversionError, GatewayError, ParseOptionError};
pub use gateway::{MarketDataGateway, MarketsQuery};
pub use gateways::CoinGeckoGateway;
pub use loadable::Loadable;
pub use metrics::GatewayMetrics;
pub use pagination::{PageItem, Pagination};
pub use state::MarketState;
pub use types::{
    ChartType, Coin, ComponentHealth, Currency, DashboardEvent, DashboardMode, HealthStatus,
    MarketChart, SearchResult, SortOrder, Theme, TimeRange,
};
