//! Gateway abstraction over the market-data REST API

use crate::{
    constants::DEFAULT_PER_PAGE,
    error::GatewayError,
    types::{
        Coin, Currency, ExchangeRates, MarketChart, SearchResult, SimplePrices, SortOrder,
        TimeRange,
    },
};
use async_trait::async_trait;

/// Parameters of a `/coins/markets` request
#[derive(Debug, Clone, PartialEq)]
pub struct MarketsQuery {
    pub currency: Currency,
    /// Restricts the listing to these coin ids; empty means no restriction
    pub ids: Vec<String>,
    pub order: SortOrder,
    pub page: u32,
    pub per_page: u32,
    /// Include the 7-day sparkline
    pub sparkline: bool,
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            ids: Vec::new(),
            order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sparkline: false,
        }
    }
}

impl MarketsQuery {
    /// Query string pairs, in the order the API documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("vs_currency", self.currency.code().to_string())];
        if !self.ids.is_empty() {
            params.push(("ids", self.ids.join(",")));
        }
        params.push(("order", self.order.as_str().to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("per_page", self.per_page.to_string()));
        if self.sparkline {
            params.push(("sparkline", "true".to_string()));
        }
        params
    }
}

/// Trait for market-data sources
///
/// One method per endpoint the dashboard uses. Implementations only fetch
/// and decode; fallbacks are the caller's business.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Paged market listing (`/coins/markets`)
    async fn coins_markets(&self, query: &MarketsQuery) -> Result<Vec<Coin>, GatewayError>;

    /// Price history for one coin (`/coins/{id}/market_chart`)
    async fn market_chart(
        &self,
        coin_id: &str,
        currency: Currency,
        range: TimeRange,
    ) -> Result<MarketChart, GatewayError>;

    /// Autocomplete search (`/search`)
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, GatewayError>;

    /// Spot prices (`/simple/price`)
    async fn simple_price(
        &self,
        ids: &[String],
        currencies: &[Currency],
    ) -> Result<SimplePrices, GatewayError>;

    /// BTC-denominated exchange rates (`/exchange_rates`)
    async fn exchange_rates(&self) -> Result<ExchangeRates, GatewayError>;

    /// Returns the name of this gateway
    fn gateway_name(&self) -> &'static str;
}
