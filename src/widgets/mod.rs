//! View models for the dashboard widgets

pub mod chart;
pub mod converter;
pub mod portfolio;
pub mod search;
pub mod table;
pub mod theme;

pub use chart::{ChartPoint, PriceChart};
pub use converter::{ConvertibleAsset, CurrencyConverter, POPULAR_ASSETS};
pub use portfolio::{PortfolioOverview, PortfolioSlice};
pub use search::{search_status, SearchStatus};
pub use table::{market_rows, MarketRow, SparklineBoard, Trend};
pub use theme::{theme_classes, ThemeClasses};
