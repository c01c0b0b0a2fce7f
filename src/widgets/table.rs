//! Market table rows and the BEXET sparkline board

use crate::{
    constants::SPARKLINE_COIN_LIMIT,
    format::{format_compact, format_percent, format_price, format_supply},
    gateway::{MarketDataGateway, MarketsQuery},
    loadable::Loadable,
    types::{Coin, Currency},
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn of(change: f64) -> Self {
        if change > 0.0 {
            Trend::Up
        } else if change < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// Direction of a sparkline, last point against first
pub fn sparkline_trend(prices: &[f64]) -> Trend {
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => Trend::of(last - first),
        _ => Trend::Flat,
    }
}

/// A coin formatted for one table row
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRow {
    pub rank: u32,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: Option<String>,
    pub price: String,
    pub change_24h: String,
    pub trend: Trend,
    pub market_cap: String,
    pub volume: String,
    pub supply: String,
}

impl MarketRow {
    /// `position` is the zero-based index in the listing, used as rank when
    /// the API does not provide one
    pub fn from_coin(coin: &Coin, currency: Currency, position: usize) -> Self {
        let change = coin.price_change_percentage_24h.unwrap_or(0.0);

        Self {
            rank: coin.market_cap_rank.unwrap_or(position as u32 + 1),
            id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.to_uppercase(),
            image: coin.image.clone(),
            price: or_na(coin.current_price, |v| format_price(v, currency)),
            change_24h: format_percent(change),
            trend: Trend::of(change),
            market_cap: or_na(coin.market_cap, |v| format_compact(v, currency)),
            volume: or_na(coin.total_volume, |v| format_compact(v, currency)),
            supply: or_na(coin.circulating_supply, format_supply),
        }
    }
}

fn or_na(value: Option<f64>, format: impl FnOnce(f64) -> String) -> String {
    value.map_or_else(|| "N/A".to_string(), format)
}

pub fn market_rows(coins: &[Coin], currency: Currency) -> Vec<MarketRow> {
    coins
        .iter()
        .enumerate()
        .map(|(i, c)| MarketRow::from_coin(c, currency, i))
        .collect()
}

/// 7-day sparklines for the first listed coins
pub struct SparklineBoard {
    gateway: Arc<dyn MarketDataGateway>,
    data: Loadable<HashMap<String, Vec<f64>>>,
}

impl SparklineBoard {
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self {
            gateway,
            data: Loadable::Idle,
        }
    }

    pub fn data(&self) -> &Loadable<HashMap<String, Vec<f64>>> {
        &self.data
    }

    /// Prices for one coin, empty if unknown
    pub fn sparkline(&self, coin_id: &str) -> &[f64] {
        self.data
            .data()
            .and_then(|m| m.get(coin_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Loads sparklines for the first coins of `listing`
    pub async fn load(&mut self, listing: &[Coin], currency: Currency) {
        let ids: Vec<String> = listing
            .iter()
            .take(SPARKLINE_COIN_LIMIT)
            .map(|c| c.id.clone())
            .collect();

        if ids.is_empty() {
            self.data = Loadable::Ready(HashMap::new());
            return;
        }

        self.data.reload();
        let query = MarketsQuery {
            currency,
            per_page: ids.len() as u32,
            ids,
            sparkline: true,
            ..MarketsQuery::default()
        };

        let result = self.gateway.coins_markets(&query).await.map(|coins| {
            coins
                .into_iter()
                .map(|c| {
                    let prices = c.sparkline().to_vec();
                    (c.id, prices)
                })
                .collect::<HashMap<_, _>>()
        });

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Sparkline data unavailable");
        }
        self.data = Loadable::settle(result, HashMap::new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{coin, MockGateway};

    #[test]
    fn rows_are_formatted() {
        let mut btc = coin("bitcoin", 1.26e12);
        btc.symbol = "btc".to_string();
        btc.current_price = Some(64_123.456);
        btc.price_change_percentage_24h = Some(-1.5);
        btc.market_cap_rank = Some(1);
        btc.circulating_supply = Some(19_700_000.0);
        btc.total_volume = None;

        let rows = market_rows(&[btc], Currency::Usd);
        let row = &rows[0];
        assert_eq!(row.rank, 1);
        assert_eq!(row.symbol, "BTC");
        assert_eq!(row.price, "$64,123.46");
        assert_eq!(row.change_24h, "-1.50%");
        assert_eq!(row.trend, Trend::Down);
        assert_eq!(row.market_cap, "$1.3T");
        assert_eq!(row.volume, "N/A");
        assert_eq!(row.supply, "19.7M");
    }

    #[test]
    fn missing_rank_uses_position() {
        let rows = market_rows(&[coin("a", 1.0), coin("b", 1.0)], Currency::Eur);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn trend_of_sparkline() {
        assert_eq!(sparkline_trend(&[1.0, 0.5, 2.0]), Trend::Up);
        assert_eq!(sparkline_trend(&[3.0, 2.0]), Trend::Down);
        assert_eq!(sparkline_trend(&[]), Trend::Flat);
    }

    #[tokio::test]
    async fn sparklines_for_first_ten_coins() {
        let gateway = Arc::new(MockGateway::new());
        let listing: Vec<Coin> = (1..=12).map(|i| coin(&format!("coin-{}", i), 1.0)).collect();
        let mut board = SparklineBoard::new(gateway.clone());

        board.load(&listing, Currency::Usd).await;

        let query = gateway.last_markets_query().unwrap();
        assert!(query.sparkline);
        assert_eq!(query.ids.len(), 10);
        assert_eq!(board.sparkline("coin-1"), &[1.0, 2.0, 3.0]);
        assert!(board.sparkline("coin-11").is_empty());
    }

    #[tokio::test]
    async fn empty_listing_skips_request_and_outage_falls_back() {
        let gateway = Arc::new(MockGateway::new());
        let mut board = SparklineBoard::new(gateway.clone());
        board.load(&[], Currency::Usd).await;
        assert!(board.data().is_ready());
        assert_eq!(gateway.call_count("coins_markets"), 0);

        gateway.set_outage(true);
        board.load(&[coin("coin-1", 1.0)], Currency::Usd).await;
        assert!(board.data().is_failed());
        assert!(board.sparkline("coin-1").is_empty());
    }
}
