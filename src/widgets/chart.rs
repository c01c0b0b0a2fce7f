//! Price chart data model

use crate::{
    constants::DEFAULT_CHART_COIN,
    gateway::MarketDataGateway,
    loadable::Loadable,
    state::MarketState,
    types::{ChartType, Currency, MarketChart, TimeRange},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One plotted point
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    /// Price rounded to two decimals
    pub price: f64,
    /// Axis label for the point
    pub label: String,
}

/// Axis label: clock time for intraday ranges, calendar date otherwise
pub fn point_label(timestamp: DateTime<Utc>, range: TimeRange) -> String {
    match range {
        TimeRange::OneDay => timestamp.format("%-I:%M%p").to_string(),
        _ => timestamp.format("%b %-d, %Y").to_string(),
    }
}

/// Converts the price series of a market chart into plotted points.
/// Pairs with an unrepresentable timestamp are skipped.
pub fn chart_points(chart: &MarketChart, range: TimeRange) -> Vec<ChartPoint> {
    chart
        .prices
        .iter()
        .filter_map(|p| {
            let timestamp = p.timestamp()?;
            Some(ChartPoint {
                timestamp,
                price: (p.value * 100.0).round() / 100.0,
                label: point_label(timestamp, range),
            })
        })
        .collect()
}

/// Price history for one coin over a selectable range
pub struct PriceChart {
    gateway: Arc<dyn MarketDataGateway>,
    coin_id: String,
    currency: Currency,
    range: TimeRange,
    chart_type: ChartType,
    data: Loadable<Vec<ChartPoint>>,
}

impl PriceChart {
    pub fn new(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self {
            gateway,
            coin_id: DEFAULT_CHART_COIN.to_string(),
            currency: Currency::default(),
            range: TimeRange::default(),
            chart_type: ChartType::default(),
            data: Loadable::Idle,
        }
    }

    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn data(&self) -> &Loadable<Vec<ChartPoint>> {
        &self.data
    }

    /// Points to plot; empty before the first load or after a failure
    pub fn points(&self) -> &[ChartPoint] {
        self.data.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Header line, e.g. `BITCOIN in USD`
    pub fn title(&self) -> String {
        format!("{} in {}", self.coin_id.to_uppercase(), self.currency)
    }

    /// Returns true if the coin changed and the data needs reloading
    pub fn set_coin(&mut self, coin_id: &str) -> bool {
        let coin_id = coin_id.trim();
        if coin_id.is_empty() || coin_id == self.coin_id {
            return false;
        }
        self.coin_id = coin_id.to_string();
        true
    }

    pub fn set_currency(&mut self, currency: Currency) -> bool {
        let changed = self.currency != currency;
        self.currency = currency;
        changed
    }

    pub fn set_range(&mut self, range: TimeRange) -> bool {
        let changed = self.range != range;
        self.range = range;
        changed
    }

    /// Chart type only affects drawing, never the data
    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    /// Follows the dashboard's currency and selected coin.
    /// Returns true if a reload is due.
    pub fn sync_with(&mut self, state: &MarketState) -> bool {
        let currency = self.set_currency(state.currency);
        let coin = state
            .selected_coin
            .as_deref()
            .is_some_and(|id| self.set_coin(id));
        currency || coin
    }

    /// Fetches the price history; an empty series is the fallback
    pub async fn load(&mut self) {
        self.data.reload();
        tracing::debug!(
            coin_id = %self.coin_id,
            currency = self.currency.code(),
            days = self.range.days(),
            "Loading chart data"
        );

        let result = self
            .gateway
            .market_chart(&self.coin_id, self.currency, self.range)
            .await;

        if let Err(e) = &result {
            tracing::warn!(coin_id = %self.coin_id, error = %e, "Chart data unavailable");
        }

        let range = self.range;
        self.data = Loadable::settle(result.map(|c| chart_points(&c, range)), Vec::new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::types::PricePoint;
    use chrono::TimeZone;

    fn sample_chart() -> MarketChart {
        MarketChart {
            prices: vec![
                PricePoint {
                    timestamp_ms: 1_711_843_200_000.0,
                    value: 70_000.126,
                },
                PricePoint {
                    timestamp_ms: 1_711_929_600_000.0,
                    value: 71_000.5,
                },
            ],
            ..MarketChart::default()
        }
    }

    #[test]
    fn labels_depend_on_range() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 31, 15, 5, 0).unwrap();
        assert_eq!(point_label(ts, TimeRange::OneDay), "3:05PM");
        assert_eq!(point_label(ts, TimeRange::OneMonth), "Mar 31, 2024");

        let morning = Utc.with_ymd_and_hms(2024, 3, 31, 0, 30, 0).unwrap();
        assert_eq!(point_label(morning, TimeRange::OneDay), "12:30AM");
    }

    #[test]
    fn points_are_rounded() {
        let points = chart_points(&sample_chart(), TimeRange::OneWeek);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].price, 70_000.13);
        assert_eq!(points[0].label, "Mar 31, 2024");
    }

    #[tokio::test]
    async fn follows_selected_coin_and_currency() {
        let gateway = Arc::new(MockGateway::new());
        gateway.set_chart(sample_chart());
        let mut chart = PriceChart::new(gateway.clone());
        assert_eq!(chart.title(), "BITCOIN in USD");

        let mut state = MarketState::new();
        assert!(!chart.sync_with(&state));

        state.set_currency(Currency::Gbp);
        state.select_coin("solana");
        assert!(chart.sync_with(&state));
        assert_eq!(chart.title(), "SOLANA in GBP");

        chart.load().await;
        assert!(chart.data().is_ready());
        assert_eq!(chart.points().len(), 2);
        assert_eq!(gateway.call_count("market_chart"), 1);
    }

    #[tokio::test]
    async fn outage_leaves_empty_series() {
        let gateway = Arc::new(MockGateway::new());
        gateway.set_outage(true);
        let mut chart = PriceChart::new(gateway);
        chart.set_range(TimeRange::OneYear);
        chart.set_chart_type(ChartType::HorizontalBar);

        chart.load().await;
        assert!(chart.data().is_failed());
        assert!(chart.points().is_empty());
        assert_eq!(chart.chart_type().index_axis(), 'y');
    }
}
