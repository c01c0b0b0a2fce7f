//! Market-cap breakdown of the largest coins (pie chart data)

use crate::{
    constants::PORTFOLIO_COINS,
    format::format_compact,
    gateway::{MarketDataGateway, MarketsQuery},
    loadable::Loadable,
    types::{Coin, Currency},
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSlice {
    pub id: String,
    pub name: String,
    pub market_cap: f64,
}

/// Zero-valued slices for the tracked coins, shown until data arrives
pub fn fallback_slices() -> Vec<PortfolioSlice> {
    PORTFOLIO_COINS
        .iter()
        .map(|(id, name)| PortfolioSlice {
            id: id.to_string(),
            name: name.to_string(),
            market_cap: 0.0,
        })
        .collect()
}

fn slices_from(coins: Vec<Coin>) -> Vec<PortfolioSlice> {
    coins
        .into_iter()
        .map(|c| PortfolioSlice {
            market_cap: c.market_cap.unwrap_or(0.0),
            id: c.id,
            name: c.name,
        })
        .collect()
}

pub struct PortfolioOverview {
    gateway: Arc<dyn MarketDataGateway>,
    data: Loadable<Vec<PortfolioSlice>>,
}

impl PortfolioOverview {
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self {
            gateway,
            data: Loadable::Idle,
        }
    }

    pub fn data(&self) -> &Loadable<Vec<PortfolioSlice>> {
        &self.data
    }

    pub async fn load(&mut self) {
        self.data.reload();
        let query = MarketsQuery {
            currency: Currency::Usd,
            ids: PORTFOLIO_COINS.iter().map(|(id, _)| id.to_string()).collect(),
            per_page: PORTFOLIO_COINS.len() as u32,
            ..MarketsQuery::default()
        };

        let result = self.gateway.coins_markets(&query).await.map(slices_from);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Portfolio data unavailable");
        }
        self.data = Loadable::settle(result, fallback_slices);
    }

    /// Slices to draw: loaded data, or zeroed placeholders
    pub fn slices(&self) -> Vec<PortfolioSlice> {
        self.data.data().cloned().unwrap_or_else(fallback_slices)
    }

    pub fn total(&self) -> f64 {
        self.slices().iter().map(|s| s.market_cap).sum()
    }

    /// Share of the total in percent; zero when nothing is known
    pub fn share(&self, slice: &PortfolioSlice) -> f64 {
        let total = self.total();
        if total > 0.0 {
            slice.market_cap / total * 100.0
        } else {
            0.0
        }
    }

    /// Compact USD total, e.g. `$2.6T`
    pub fn formatted_total(&self) -> String {
        format_compact(self.total(), Currency::Usd)
    }

    /// Tooltip text, e.g. `Bitcoin: $1260.0B (55.3%)`
    pub fn tooltip(&self, slice: &PortfolioSlice) -> String {
        format!(
            "{}: ${:.1}B ({:.1}%)",
            slice.name,
            slice.market_cap / 1e9,
            self.share(slice)
        )
    }
}
