//! CoinGecko gateway implementation

use crate::{
    config::GatewayConfig,
    constants::{
        API_KEY_PARAM, COINS_ENDPOINT, COINS_MARKETS_ENDPOINT, EXCHANGE_RATES_ENDPOINT,
        MARKET_CHART_SEGMENT, SEARCH_ENDPOINT, SIMPLE_PRICE_ENDPOINT,
    },
    error::GatewayError,
    gateway::{MarketDataGateway, MarketsQuery},
    types::{
        Coin, Currency, ExchangeRates, MarketChart, SearchResponse, SearchResult, SimplePrices,
        TimeRange,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// CoinGecko v3 REST gateway
pub struct CoinGeckoGateway {
    client: Client,
    config: GatewayConfig,
}

impl CoinGeckoGateway {
    /// Creates a new gateway from the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(GatewayError::Network)?;

        Ok(Self { client, config })
    }

    /// Creates a gateway configured from the environment
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    /// Builds the request URL, appending the API key when one is configured
    pub fn build_url(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Url, GatewayError> {
        let raw = format!("{}{}", self.config.base_url, path);
        let mut url =
            Url::parse(&raw).map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", raw, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            if let Some(key) = &self.config.api_key {
                pairs.append_pair(API_KEY_PARAM, key);
            }
        }

        // query_pairs_mut leaves a bare '?' behind when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }

    /// URL of a coin's price history. The coin id is percent-encoded as a
    /// single path segment.
    pub fn chart_url(
        &self,
        coin_id: &str,
        currency: Currency,
        range: TimeRange,
    ) -> Result<Url, GatewayError> {
        let coin_id = coin_id.trim();
        if coin_id.is_empty() {
            return Err(GatewayError::InvalidUrl("empty coin id".to_string()));
        }

        let mut url = self.build_url(COINS_ENDPOINT, &chart_params(currency, range))?;
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::InvalidUrl(format!("{} cannot take a path", self.config.base_url))
            })?
            .push(coin_id)
            .push(MARKET_CHART_SEGMENT);
        Ok(url)
    }

    /// Issues a GET request and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let url = self.build_url(path, params)?;
        self.fetch(path, url).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, url: Url) -> Result<T, GatewayError> {
        tracing::debug!(endpoint = path, "Requesting market data");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(GatewayError::http(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let body = response.text().await.map_err(GatewayError::from_transport)?;
        decode(path, &body)
    }
}

/// Decodes a response body, keeping a short excerpt of it in the error
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| {
        let excerpt: String = body.chars().take(200).collect();
        GatewayError::invalid_response(format!(
            "Failed to parse {} response: {}. Response: {}",
            path, e, excerpt
        ))
    })
}

fn chart_params(currency: Currency, range: TimeRange) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("vs_currency", currency.code().to_string()),
        ("days", range.days().to_string()),
    ];
    if let Some(interval) = range.interval() {
        params.push(("interval", interval.to_string()));
    }
    params
}

#[async_trait]
impl MarketDataGateway for CoinGeckoGateway {
    async fn coins_markets(&self, query: &MarketsQuery) -> Result<Vec<Coin>, GatewayError> {
        let coins: Vec<Coin> = self
            .get_json(COINS_MARKETS_ENDPOINT, &query.to_params())
            .await?;

        tracing::debug!(
            count = coins.len(),
            currency = query.currency.code(),
            page = query.page,
            "Fetched market listing"
        );

        Ok(coins)
    }

    async fn market_chart(
        &self,
        coin_id: &str,
        currency: Currency,
        range: TimeRange,
    ) -> Result<MarketChart, GatewayError> {
        let url = self.chart_url(coin_id, currency, range)?;
        self.fetch("/coins/{id}/market_chart", url).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, GatewayError> {
        let response: SearchResponse = self
            .get_json(SEARCH_ENDPOINT, &[("query", query.to_string())])
            .await?;
        Ok(response.coins)
    }

    async fn simple_price(
        &self,
        ids: &[String],
        currencies: &[Currency],
    ) -> Result<SimplePrices, GatewayError> {
        if ids.is_empty() || currencies.is_empty() {
            return Ok(SimplePrices::default());
        }

        let vs = currencies
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(",");

        let prices: SimplePrices = self
            .get_json(
                SIMPLE_PRICE_ENDPOINT,
                &[("ids", ids.join(",")), ("vs_currencies", vs)],
            )
            .await?;

        if prices.is_empty() {
            return Err(GatewayError::invalid_response(
                "No prices returned from CoinGecko",
            ));
        }

        Ok(prices)
    }

    async fn exchange_rates(&self) -> Result<ExchangeRates, GatewayError> {
        self.get_json(EXCHANGE_RATES_ENDPOINT, &[]).await
    }

    fn gateway_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn gateway(api_key: Option<&str>) -> CoinGeckoGateway {
        let config = GatewayConfig::default().with_api_key(api_key.map(str::to_string));
        CoinGeckoGateway::new(config).unwrap()
    }

    /// Answers one request on a local port with a canned response, after `delay`
    async fn serve_once(response: String, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                tokio::time::sleep(delay).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            concat!(
                "HTTP/1.1 {}\r\n",
                "content-type: application/json\r\n",
                "content-length: {}\r\n",
                "connection: close\r\n\r\n{}"
            ),
            status,
            body.len(),
            body
        )
    }

    /// Gateway against a local server, bypassing any system proxy
    fn local_gateway(base_url: String, timeout: Duration) -> CoinGeckoGateway {
        let config = GatewayConfig::default()
            .with_base_url(base_url)
            .with_timeout(timeout);
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .unwrap();
        CoinGeckoGateway { client, config }
    }

    async fn respond_with(status: &str, body: &str) -> CoinGeckoGateway {
        let base_url = serve_once(http_response(status, body), Duration::ZERO).await;
        local_gateway(base_url, Duration::from_secs(5))
    }

    #[test]
    fn url_carries_params_and_api_key() {
        let gw = gateway(Some("CG-demo"));
        let url = gw
            .build_url(
                COINS_MARKETS_ENDPOINT,
                &MarketsQuery::default().to_params(),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            concat!(
                "https://api.coingecko.com/api/v3/coins/markets",
                "?vs_currency=usd&order=market_cap_desc&page=1&per_page=8",
                "&x_cg_demo_api_key=CG-demo"
            )
        );
    }

    #[test]
    fn url_without_key_or_params_has_no_query() {
        let gw = gateway(None);
        let url = gw.build_url(EXCHANGE_RATES_ENDPOINT, &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.coingecko.com/api/v3/exchange_rates");
    }

    #[test]
    fn search_query_is_encoded() {
        let gw = gateway(None);
        let url = gw
            .build_url(SEARCH_ENDPOINT, &[("query", "shiba inu&co".to_string())])
            .unwrap();
        assert_eq!(url.query(), Some("query=shiba+inu%26co"));
    }

    #[test]
    fn chart_params_skip_unsupported_intervals() {
        let week = chart_params(Currency::Usd, TimeRange::OneWeek);
        assert!(week.contains(&("interval", "daily".to_string())));

        let year = chart_params(Currency::Jpy, TimeRange::OneYear);
        assert_eq!(
            year,
            vec![("vs_currency", "jpy".to_string()), ("days", "365".to_string())]
        );
    }

    #[test]
    fn decode_reports_malformed_bodies() {
        let err = decode::<Vec<Coin>>("/coins/markets", "<html>oops</html>").unwrap_err();
        match err {
            GatewayError::InvalidResponse(msg) => assert!(msg.contains("/coins/markets")),
            other => panic!("unexpected error: {other}"),
        }

        let hits: SearchResponse = decode("/search", r#"{"exchanges": []}"#).unwrap();
        assert!(hits.coins.is_empty());
    }

    #[tokio::test]
    async fn blank_coin_id_is_rejected_before_sending() {
        let gw = gateway(None);
        let err = gw
            .market_chart("  ", Currency::Usd, TimeRange::OneDay)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUrl(_)));
    }

    #[test]
    fn chart_url_encodes_coin_id_as_one_segment() {
        let gw = gateway(None);
        let url = gw
            .chart_url(" a/b c ", Currency::Usd, TimeRange::OneDay)
            .unwrap();
        assert_eq!(url.path(), "/api/v3/coins/a%2Fb%20c/market_chart");
        assert_eq!(url.query(), Some("vs_currency=usd&days=1"));
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limit() {
        let gw = respond_with("429 Too Many Requests", "").await;
        let err = gw.exchange_rates().await.unwrap_err();
        assert!(matches!(err, GatewayError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let gw = respond_with("503 Service Unavailable", "down").await;
        let err = gw.search("btc").await.unwrap_err();
        match err {
            GatewayError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let base_url = serve_once(http_response("200 OK", "[]"), Duration::from_secs(3)).await;
        let gw = local_gateway(base_url, Duration::from_millis(100));

        let err = gw
            .coins_markets(&MarketsQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout), "got {err}");
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid_response() {
        let gw = respond_with("200 OK", "<html>oops</html>").await;
        let err = gw
            .coins_markets(&MarketsQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn exchange_rates_are_decoded() {
        let body = concat!(
            r#"{"rates":{"usd":"#,
            r#"{"name":"US Dollar","unit":"$","value":64000.0,"type":"fiat"}}}"#
        );
        let gw = respond_with("200 OK", body).await;
        let rates = gw.exchange_rates().await.unwrap();
        assert_eq!(rates.per_btc(Currency::Usd), Some(64_000.0));
    }
}
