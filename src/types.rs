//! Types for the dashboard: option sets, API payloads and events

use crate::error::ParseOptionError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Quote currencies offered by the currency selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Indian Rupee
    Inr,
    /// Euro
    Eur,
    /// Japanese Yen
    Jpy,
    /// Australian Dollar
    Aud,
    /// New Zealand Dollar
    Nzd,
    /// Canadian Dollar
    Cad,
    /// British Pound
    Gbp,
}

impl Currency {
    /// Lowercase code as the API expects it (`vs_currency`)
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Inr => "inr",
            Currency::Eur => "eur",
            Currency::Jpy => "jpy",
            Currency::Aud => "aud",
            Currency::Nzd => "nzd",
            Currency::Cad => "cad",
            Currency::Gbp => "gbp",
        }
    }

    /// Display symbol (en-US conventions)
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Jpy => "¥",
            Currency::Aud => "A$",
            Currency::Nzd => "NZ$",
            Currency::Cad => "CA$",
            Currency::Gbp => "£",
        }
    }

    /// Get all supported currencies
    pub fn all() -> &'static [Currency] {
        &[
            Currency::Usd,
            Currency::Inr,
            Currency::Eur,
            Currency::Jpy,
            Currency::Aud,
            Currency::Nzd,
            Currency::Cad,
            Currency::Gbp,
        ]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code().to_uppercase())
    }
}

impl FromStr for Currency {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Currency::all()
            .iter()
            .copied()
            .find(|c| c.code() == lower)
            .ok_or_else(|| ParseOptionError::new("currency", s))
    }
}

/// Sort orders offered by the sort selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
    VolumeDesc,
    VolumeAsc,
    IdDesc,
    IdAsc,
}

impl SortOrder {
    /// Value of the `order` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
            SortOrder::VolumeDesc => "volume_desc",
            SortOrder::VolumeAsc => "volume_asc",
            SortOrder::IdDesc => "id_desc",
            SortOrder::IdAsc => "id_asc",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "Market Cap (High to Low)",
            SortOrder::MarketCapAsc => "Market Cap (Low to High)",
            SortOrder::VolumeDesc => "Volume (High to Low)",
            SortOrder::VolumeAsc => "Volume (Low to High)",
            SortOrder::IdDesc => "Name (Z to A)",
            SortOrder::IdAsc => "Name (A to Z)",
        }
    }

    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::MarketCapDesc,
            SortOrder::MarketCapAsc,
            SortOrder::VolumeDesc,
            SortOrder::VolumeAsc,
            SortOrder::IdDesc,
            SortOrder::IdAsc,
        ]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::all()
            .iter()
            .copied()
            .find(|o| o.as_str() == s.trim())
            .ok_or_else(|| ParseOptionError::new("sort order", s))
    }
}

/// Chart time-range buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    OneDay,
    #[default]
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl TimeRange {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::OneDay => "1D",
            TimeRange::OneWeek => "1W",
            TimeRange::OneMonth => "1M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
        }
    }

    /// Value of the `days` query parameter
    pub fn days(&self) -> u32 {
        match self {
            TimeRange::OneDay => 1,
            TimeRange::OneWeek => 7,
            TimeRange::OneMonth => 30,
            TimeRange::SixMonths => 180,
            TimeRange::OneYear => 365,
        }
    }

    /// Value of the `interval` query parameter.
    ///
    /// Only `daily` is accepted on the public tier; for the other ranges the
    /// API picks its own granularity and the parameter is omitted.
    pub fn interval(&self) -> Option<&'static str> {
        match self {
            TimeRange::OneWeek | TimeRange::OneMonth => Some("daily"),
            TimeRange::OneDay | TimeRange::SixMonths | TimeRange::OneYear => None,
        }
    }

    pub fn all() -> &'static [TimeRange] {
        &[
            TimeRange::OneDay,
            TimeRange::OneWeek,
            TimeRange::OneMonth,
            TimeRange::SixMonths,
            TimeRange::OneYear,
        ]
    }
}

impl FromStr for TimeRange {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        TimeRange::all()
            .iter()
            .copied()
            .find(|r| r.label() == upper)
            .ok_or_else(|| ParseOptionError::new("time range", s))
    }
}

/// Chart type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    HorizontalBar,
}

impl ChartType {
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Line => "Line Chart",
            ChartType::Bar => "Bar Chart",
            ChartType::HorizontalBar => "Horizontal Bar",
        }
    }

    /// Axis the values are laid out along
    pub fn index_axis(&self) -> char {
        match self {
            ChartType::HorizontalBar => 'y',
            ChartType::Line | ChartType::Bar => 'x',
        }
    }
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Dashboard layout variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardMode {
    #[default]
    BlockLens,
    Bexet,
}

impl DashboardMode {
    pub fn toggled(&self) -> DashboardMode {
        match self {
            DashboardMode::BlockLens => DashboardMode::Bexet,
            DashboardMode::Bexet => DashboardMode::BlockLens,
        }
    }
}

/// 7-day sparkline attached to a market listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<f64>,
}

/// A coin as returned by `/coins/markets`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

impl Coin {
    /// Sparkline prices, empty when the listing was fetched without them
    pub fn sparkline(&self) -> &[f64] {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or(&[])
    }
}

/// A search autocomplete hit from `/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

/// Body of `/search`; only the coin hits are used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchResult>,
}

/// One `[timestamp_ms, value]` pair of a market chart series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp_ms: f64,
    pub value: f64,
}

impl PricePoint {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms as i64).single()
    }
}

/// Body of `/coins/{id}/market_chart`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub market_caps: Vec<PricePoint>,
    #[serde(default)]
    pub total_volumes: Vec<PricePoint>,
}

/// Body of `/simple/price`: coin id -> currency code -> price
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimplePrices(pub HashMap<String, HashMap<String, f64>>);

impl SimplePrices {
    pub fn price(&self, id: &str, currency: Currency) -> Option<f64> {
        self.0.get(id).and_then(|m| m.get(currency.code())).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single entry of `/exchange_rates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub name: String,
    pub unit: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Body of `/exchange_rates` (values are per 1 BTC)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    #[serde(default)]
    pub rates: HashMap<String, ExchangeRate>,
}

impl ExchangeRates {
    /// How many units of `currency` one BTC buys
    pub fn per_btc(&self, currency: Currency) -> Option<f64> {
        self.rates.get(currency.code()).map(|r| r.value)
    }
}

/// Events broadcast by the dashboard so views can re-render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// The market list was replaced
    CoinsUpdated {
        id: Uuid,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// The chart coin picker list was replaced
    ChartListUpdated {
        id: Uuid,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Search results were replaced
    SearchUpdated {
        id: Uuid,
        query: String,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fetch failed and a fallback is being shown
    FetchFailed {
        id: Uuid,
        endpoint: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A coin was picked for the price chart
    ChartCoinSelected {
        id: Uuid,
        coin_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Theme or layout variant changed
    AppearanceChanged {
        id: Uuid,
        theme: Theme,
        mode: DashboardMode,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    pub(crate) fn coins_updated(count: usize) -> Self {
        Self::CoinsUpdated {
            id: Uuid::new_v4(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn chart_list_updated(count: usize) -> Self {
        Self::ChartListUpdated {
            id: Uuid::new_v4(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn search_updated(query: &str, count: usize) -> Self {
        Self::SearchUpdated {
            id: Uuid::new_v4(),
            query: query.to_string(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn fetch_failed(endpoint: &str, error_message: String) -> Self {
        Self::FetchFailed {
            id: Uuid::new_v4(),
            endpoint: endpoint.to_string(),
            error_message,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn chart_coin_selected(coin_id: &str) -> Self {
        Self::ChartCoinSelected {
            id: Uuid::new_v4(),
            coin_id: coin_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn appearance_changed(theme: Theme, mode: DashboardMode) -> Self {
        Self::AppearanceChanged {
            id: Uuid::new_v4(),
            theme,
            mode,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            DashboardEvent::CoinsUpdated { id, .. }
            | DashboardEvent::ChartListUpdated { id, .. }
            | DashboardEvent::SearchUpdated { id, .. }
            | DashboardEvent::FetchFailed { id, .. }
            | DashboardEvent::ChartCoinSelected { id, .. }
            | DashboardEvent::AppearanceChanged { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::CoinsUpdated { .. } => "COINS_UPDATED",
            DashboardEvent::ChartListUpdated { .. } => "CHART_LIST_UPDATED",
            DashboardEvent::SearchUpdated { .. } => "SEARCH_UPDATED",
            DashboardEvent::FetchFailed { .. } => "FETCH_FAILED",
            DashboardEvent::ChartCoinSelected { .. } => "CHART_COIN_SELECTED",
            DashboardEvent::AppearanceChanged { .. } => "APPEARANCE_CHANGED",
        }
    }
}

impl fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardEvent::CoinsUpdated { count, .. } => {
                write!(f, "Market list updated: {} coins", count)
            }
            DashboardEvent::ChartListUpdated { count, .. } => {
                write!(f, "Chart coin list updated: {} coins", count)
            }
            DashboardEvent::SearchUpdated { query, count, .. } => {
                write!(f, "Search '{}' returned {} results", query, count)
            }
            DashboardEvent::FetchFailed {
                endpoint,
                error_message,
                ..
            } => write!(f, "Fetch failed for {}: {}", endpoint, error_message),
            DashboardEvent::ChartCoinSelected { coin_id, .. } => {
                write!(f, "Chart coin selected: {}", coin_id)
            }
            DashboardEvent::AppearanceChanged { theme, mode, .. } => {
                write!(f, "Appearance changed: {} / {:?}", theme.as_str(), mode)
            }
        }
    }
}

/// Overall system health status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// All data is loaded from the API
    Healthy,
    /// Some widgets are showing fallback data
    Degraded,
    /// Nothing could be loaded
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub details: HashMap<String, serde_json::Value>,
    pub last_checked: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_parsing_rejects_unknown_codes() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!(" gbp ".parse::<Currency>().unwrap(), Currency::Gbp);
        let err = "btc".parse::<Currency>().unwrap_err();
        assert_eq!(err.kind, "currency");
        assert_eq!(Currency::all().len(), 8);
    }

    #[test]
    fn sort_order_round_trips_through_query_value() {
        for order in SortOrder::all() {
            assert_eq!(order.as_str().parse::<SortOrder>().unwrap(), *order);
        }
        assert!("price_desc".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::all().len(), 6);
    }

    #[test]
    fn time_ranges_map_to_days() {
        let days: Vec<u32> = TimeRange::all().iter().map(|r| r.days()).collect();
        assert_eq!(days, vec![1, 7, 30, 180, 365]);
        assert_eq!("6m".parse::<TimeRange>().unwrap(), TimeRange::SixMonths);
        assert_eq!(TimeRange::OneYear.interval(), None);
    }

    #[test]
    fn coin_deserializes_with_nulls_and_sparkline() {
        let json = r#"{
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "image": "https://example.invalid/btc.png",
            "current_price": 64000.5, "market_cap": 1.26e12, "market_cap_rank": 1,
            "total_volume": null, "price_change_percentage_24h": -1.25,
            "circulating_supply": 19700000.0,
            "sparkline_in_7d": { "price": [1.0, 2.0, 3.0] }
        }"#;
        let coin: Coin = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.total_volume, None);
        assert_eq!(coin.market_cap_change_percentage_24h, None);
        assert_eq!(coin.sparkline(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn market_chart_pairs_deserialize() {
        let json = r#"{ "prices": [[1711843200000, 70000.123], [1711929600000, 71000.5]] }"#;
        let chart: MarketChart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[1].value, 71000.5);
        assert!(chart.market_caps.is_empty());
        let ts = chart.prices[0].timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_711_843_200);
    }

    #[test]
    fn simple_prices_lookup() {
        let json = r#"{ "bitcoin": { "usd": 64000.0 }, "ethereum": { "usd": 3200.0 } }"#;
        let prices: SimplePrices = serde_json::from_str(json).unwrap();
        assert_eq!(prices.price("ethereum", Currency::Usd), Some(3200.0));
        assert_eq!(prices.price("ethereum", Currency::Eur), None);
        assert_eq!(prices.price("solana", Currency::Usd), None);
    }

    #[test]
    fn theme_toggle_is_an_involution() {
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
        assert_eq!(
            DashboardMode::BlockLens.toggled(),
            DashboardMode::Bexet
        );
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = DashboardEvent::coins_updated(8);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "COINS_UPDATED");
        assert_eq!(event.event_type(), "COINS_UPDATED");
        assert_eq!(event.to_string(), "Market list updated: 8 coins");
    }
}
