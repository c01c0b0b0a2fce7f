//! Shared market state orchestrator
//!
//! `MarketDashboard` owns the user-controlled [`MarketState`] and the data
//! fetched for it. Setters that change a fetch parameter re-fetch right away;
//! views learn about new data through [`DashboardEvent`]s.

use crate::{
    config::GatewayConfig,
    constants::{CHART_COIN_LIST_SIZE, EVENT_CHANNEL_CAPACITY, SEARCH_DEBOUNCE_MS},
    debounce::Debouncer,
    error::GatewayError,
    gateway::{MarketDataGateway, MarketsQuery},
    gateways::CoinGeckoGateway,
    loadable::Loadable,
    metrics::{GatewayMetrics, MetricsCollector},
    pagination::Pagination,
    state::MarketState,
    types::{
        Coin, ComponentHealth, Currency, DashboardEvent, DashboardMode, HealthStatus,
        SearchResult, SortOrder, Theme,
    },
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, OnceCell, RwLock};

static GLOBAL_DASHBOARD: OnceCell<Arc<MarketDashboard>> = OnceCell::const_new();

/// Shared market state and the data fetched for it
///
/// Every fetch stream (market list, chart coin list, search) carries a
/// generation number. A response that comes back after a newer request was
/// issued is dropped, so rapid parameter changes never leave stale data on
/// screen.
///
/// # Example
/// ```no_run
/// use blocklens_sdk::{Currency, MarketDashboard};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dashboard = MarketDashboard::from_env()?;
/// dashboard.refresh_all().await;
/// dashboard.set_currency(Currency::Eur).await;
///
/// if let Some(coins) = dashboard.coins().await.data() {
///     for coin in coins {
///         println!("{}: {:?}", coin.name, coin.current_price);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDashboard {
    gateway: Arc<dyn MarketDataGateway>,
    state: RwLock<MarketState>,
    coins: RwLock<Loadable<Vec<Coin>>>,
    chart_coins: RwLock<Loadable<Vec<Coin>>>,
    search_results: RwLock<Loadable<Vec<SearchResult>>>,
    coins_generation: AtomicU64,
    chart_generation: AtomicU64,
    search_generation: AtomicU64,
    search_debouncer: Debouncer,
    events: broadcast::Sender<DashboardEvent>,
    metrics: MetricsCollector,
}

impl MarketDashboard {
    /// Returns the process-wide dashboard, creating it from the environment
    /// and loading its data on first use.
    pub async fn global() -> Result<Arc<Self>, GatewayError> {
        GLOBAL_DASHBOARD
            .get_or_try_init(|| async {
                let dashboard = Arc::new(Self::from_env()?);
                dashboard.refresh_all().await;
                Ok::<_, GatewayError>(dashboard)
            })
            .await
            .cloned()
    }

    /// Creates a dashboard backed by CoinGecko
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = CoinGeckoGateway::new(config)?;
        Ok(Self::with_gateway(Arc::new(gateway)))
    }

    /// Creates a dashboard backed by CoinGecko, configured from the environment
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    /// Creates a dashboard with a custom gateway
    pub fn with_gateway(gateway: Arc<dyn MarketDataGateway>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let metrics = MetricsCollector::new(gateway.gateway_name());

        Self {
            gateway,
            state: RwLock::new(MarketState::new()),
            coins: RwLock::new(Loadable::Idle),
            chart_coins: RwLock::new(Loadable::Idle),
            search_results: RwLock::new(Loadable::Idle),
            coins_generation: AtomicU64::new(0),
            chart_generation: AtomicU64::new(0),
            search_generation: AtomicU64::new(0),
            search_debouncer: Debouncer::new(Duration::from_millis(SEARCH_DEBOUNCE_MS)),
            events,
            metrics,
        }
    }

    /// The gateway, for widgets that fetch on their own
    pub fn gateway(&self) -> Arc<dyn MarketDataGateway> {
        self.gateway.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current parameters
    pub async fn state(&self) -> MarketState {
        self.state.read().await.clone()
    }

    /// The market list for the current parameters
    pub async fn coins(&self) -> Loadable<Vec<Coin>> {
        self.coins.read().await.clone()
    }

    /// Top coins by market cap, for the chart coin picker
    pub async fn chart_coins(&self) -> Loadable<Vec<Coin>> {
        self.chart_coins.read().await.clone()
    }

    pub async fn search_results(&self) -> Loadable<Vec<SearchResult>> {
        self.search_results.read().await.clone()
    }

    pub async fn pagination(&self) -> Pagination {
        self.state.read().await.pagination()
    }

    /// The pagination control, or `None` when it should not be shown: a
    /// single page, or a first page or filtered list shorter than one page.
    /// A short last page keeps the control.
    pub async fn pagination_view(&self) -> Option<Pagination> {
        let (pagination, filtered) = {
            let state = self.state.read().await;
            (state.pagination(), !state.coin_filter.is_empty())
        };
        let loaded = self.coins.read().await.data().map_or(0, Vec::len);
        let short = loaded < pagination.per_page() as usize;
        let hidden = short && (filtered || pagination.current() == 1);
        (pagination.should_render() && !hidden).then_some(pagination)
    }

    pub async fn set_currency(&self, currency: Currency) {
        if self.state.write().await.set_currency(currency) {
            tracing::debug!(currency = currency.code(), "Currency changed");
            self.refresh_all().await;
        }
    }

    pub async fn set_sort_by(&self, sort_by: SortOrder) {
        if self.state.write().await.set_sort_by(sort_by) {
            self.refresh_coins().await;
        }
    }

    /// Moves to `page`, clamped into the valid range
    pub async fn set_page(&self, page: u32) {
        if self.state.write().await.set_page(page) {
            self.refresh_coins().await;
        }
    }

    pub async fn set_per_page(&self, per_page: u32) {
        if self.state.write().await.set_per_page(per_page) {
            self.refresh_coins().await;
        }
    }

    /// Restricts the market list to a comma separated set of coin ids
    pub async fn set_coin_filter(&self, ids: &str) {
        if self.state.write().await.set_coin_filter(ids) {
            self.refresh_coins().await;
        }
    }

    /// Back to page 1 with default sort, no coin filter and no search
    pub async fn reset_filters(&self) {
        let changed = self.state.write().await.reset_filters();
        self.discard_search().await;
        if changed {
            self.refresh_coins().await;
        }
    }

    /// Records the typed query and dispatches it once typing pauses
    pub async fn search(self: &Arc<Self>, query: &str) {
        self.state.write().await.set_search_query(query);

        let query = query.trim().to_string();
        if query.is_empty() {
            self.discard_search().await;
            return;
        }

        let dashboard = Arc::downgrade(self);
        self.search_debouncer.schedule(async move {
            if let Some(dashboard) = dashboard.upgrade() {
                dashboard.search_now(&query).await;
            }
        });
    }

    /// Runs a search immediately, replacing the previous results
    pub async fn search_now(&self, query: &str) {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.search_results.write().await.reload();

        let result = self.timed("search", self.gateway.search(query)).await;

        let mut slot = self.search_results.write().await;
        if self.search_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(query, "Discarding superseded search response");
            return;
        }

        let event = match &result {
            Ok(hits) => DashboardEvent::search_updated(query, hits.len()),
            Err(e) => DashboardEvent::fetch_failed("search", e.to_string()),
        };
        *slot = Loadable::settle(result, Vec::new);
        drop(slot);
        self.emit(event);
    }

    /// Clears the search box and its results
    pub async fn clear_search(&self) {
        self.state.write().await.set_search_query("");
        self.discard_search().await;
    }

    /// Points the price chart at `coin_id` and closes the search dropdown
    pub async fn select_coin_for_chart(&self, coin_id: &str) {
        let changed = self.state.write().await.select_coin(coin_id);
        self.clear_search().await;
        if changed {
            tracing::debug!(coin_id, "Coin selected for chart");
            self.emit(DashboardEvent::chart_coin_selected(coin_id));
        }
    }

    pub async fn set_theme(&self, theme: Theme) {
        let mut state = self.state.write().await;
        if state.set_theme(theme) {
            let event = DashboardEvent::appearance_changed(state.theme, state.mode);
            drop(state);
            self.emit(event);
        }
    }

    pub async fn toggle_theme(&self) -> Theme {
        let theme = self.state.read().await.theme.toggled();
        self.set_theme(theme).await;
        theme
    }

    pub async fn set_mode(&self, mode: DashboardMode) {
        let mut state = self.state.write().await;
        if state.set_mode(mode) {
            let event = DashboardEvent::appearance_changed(state.theme, state.mode);
            drop(state);
            self.emit(event);
        }
    }

    pub async fn toggle_mode(&self) -> DashboardMode {
        let mode = self.state.read().await.mode.toggled();
        self.set_mode(mode).await;
        mode
    }

    /// Re-fetches the market list and the chart coin list concurrently
    pub async fn refresh_all(&self) {
        futures::join!(self.refresh_coins(), self.refresh_chart_list());
    }

    /// Re-fetches the market list for the current parameters
    pub async fn refresh_coins(&self) {
        let generation = self.coins_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.coins.write().await.reload();
        let query = self.state.read().await.markets_query();

        let result = self
            .timed("coins_markets", self.gateway.coins_markets(&query))
            .await;

        let mut slot = self.coins.write().await;
        if self.coins_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(page = query.page, "Discarding superseded market listing");
            return;
        }

        let event = match &result {
            Ok(coins) => DashboardEvent::coins_updated(coins.len()),
            Err(e) => DashboardEvent::fetch_failed("coins_markets", e.to_string()),
        };
        *slot = Loadable::settle(result, Vec::new);
        drop(slot);
        self.emit(event);
    }

    /// Re-fetches the top coins by market cap for the chart coin picker
    pub async fn refresh_chart_list(&self) {
        let generation = self.chart_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.chart_coins.write().await.reload();
        let query = MarketsQuery {
            currency: self.state.read().await.currency,
            per_page: CHART_COIN_LIST_SIZE,
            ..MarketsQuery::default()
        };

        let result = self
            .timed("coins_markets", self.gateway.coins_markets(&query))
            .await;

        let mut slot = self.chart_coins.write().await;
        if self.chart_generation.load(Ordering::SeqCst) != generation {
            return;
        }

        let event = match &result {
            Ok(coins) => DashboardEvent::chart_list_updated(coins.len()),
            Err(e) => DashboardEvent::fetch_failed("coins_markets", e.to_string()),
        };
        *slot = Loadable::settle(result, Vec::new);
        drop(slot);
        self.emit(event);
    }

    /// Gets request metrics for the gateway
    pub async fn gateway_metrics(&self) -> GatewayMetrics {
        self.metrics.snapshot().await
    }

    /// Perform a health check on the dashboard's data
    pub async fn health_check(&self) -> ComponentHealth {
        let coins = self.coins.read().await.clone();
        let chart_coins = self.chart_coins.read().await.clone();

        let mut details = HashMap::new();
        details.insert(
            "gateway_name".to_string(),
            serde_json::json!(self.gateway.gateway_name()),
        );
        details.insert(
            "listed_coins".to_string(),
            serde_json::json!(coins.data().map_or(0, Vec::len)),
        );

        let failed: Vec<&str> = [("coins", &coins), ("chart_coins", &chart_coins)]
            .iter()
            .filter(|(_, l)| l.is_failed())
            .map(|(name, _)| *name)
            .collect();
        details.insert("failed".to_string(), serde_json::json!(failed));

        let status = if coins.is_ready() && chart_coins.is_ready() {
            HealthStatus::Healthy
        } else if coins.is_ready() || chart_coins.is_ready() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };

        let message = match status {
            HealthStatus::Healthy => "Market data is live".to_string(),
            HealthStatus::Degraded => {
                format!("Showing fallback data for: {}", failed.join(", "))
            }
            HealthStatus::Unhealthy => "No market data has been loaded".to_string(),
        };

        ComponentHealth {
            name: "market_dashboard".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: chrono::Utc::now(),
        }
    }

    async fn discard_search(&self) {
        self.search_debouncer.cancel();
        self.search_generation.fetch_add(1, Ordering::SeqCst);
        *self.search_results.write().await = Loadable::Idle;
    }

    /// Awaits a gateway call, recording its latency and logging failures
    async fn timed<T>(
        &self,
        endpoint: &'static str,
        request: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        let start = Instant::now();
        let result = request.await;
        self.metrics
            .record_request(endpoint, start.elapsed(), result.is_ok())
            .await;

        if let Err(e) = &result {
            tracing::warn!(
                endpoint,
                gateway = self.gateway.gateway_name(),
                error = %e,
                "Market data request failed, using fallback"
            );
        }
        result
    }

    fn emit(&self, event: DashboardEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
