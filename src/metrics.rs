//! Gateway request metrics
//!
//! Keeps a rolling window of request latencies per endpoint plus lifetime
//! success/failure counts.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples kept per endpoint
const MAX_SAMPLES: usize = 100;

/// Metrics for one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointMetrics {
    pub endpoint: String,
    /// 50th percentile latency of successful requests, in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful requests, in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    pub total_requests: u64,
    pub failed_requests: u64,
}

/// Snapshot across all endpoints of one gateway
#[derive(Debug, Clone)]
pub struct GatewayMetrics {
    pub gateway_name: String,
    pub endpoints: Vec<EndpointMetrics>,
}

impl GatewayMetrics {
    pub fn endpoint(&self, name: &str) -> Option<&EndpointMetrics> {
        self.endpoints.iter().find(|e| e.endpoint == name)
    }

    pub fn total_requests(&self) -> u64 {
        self.endpoints.iter().map(|e| e.total_requests).sum()
    }

    pub fn failed_requests(&self) -> u64 {
        self.endpoints.iter().map(|e| e.failed_requests).sum()
    }
}

#[derive(Debug, Default)]
struct EndpointSamples {
    latencies_ms: VecDeque<(f64, bool)>,
    total: u64,
    failed: u64,
}

/// Collects request outcomes for a gateway
pub struct MetricsCollector {
    gateway_name: String,
    endpoints: RwLock<HashMap<String, EndpointSamples>>,
}

impl MetricsCollector {
    pub fn new(gateway_name: &str) -> Self {
        Self {
            gateway_name: gateway_name.to_string(),
            endpoints: RwLock::new(HashMap::new()),
        }
    }

    /// Records one request against an endpoint
    pub async fn record_request(&self, endpoint: &str, duration: Duration, success: bool) {
        let mut endpoints = self.endpoints.write().await;
        let samples = endpoints.entry(endpoint.to_string()).or_default();

        samples.total += 1;
        if !success {
            samples.failed += 1;
        }

        if samples.latencies_ms.len() >= MAX_SAMPLES {
            samples.latencies_ms.pop_front();
        }
        samples
            .latencies_ms
            .push_back((duration.as_secs_f64() * 1000.0, success));
    }

    pub async fn snapshot(&self) -> GatewayMetrics {
        let endpoints = self.endpoints.read().await;
        let mut result: Vec<EndpointMetrics> = endpoints
            .iter()
            .map(|(name, samples)| {
                let mut latencies: Vec<f64> = samples
                    .latencies_ms
                    .iter()
                    .filter(|(_, ok)| *ok)
                    .map(|(ms, _)| *ms)
                    .collect();
                latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

                let success_rate = if samples.total > 0 {
                    (samples.total - samples.failed) as f64 / samples.total as f64
                } else {
                    1.0
                };

                EndpointMetrics {
                    endpoint: name.clone(),
                    latency_p50_ms: percentile(&latencies, 50.0),
                    latency_p99_ms: percentile(&latencies, 99.0),
                    success_rate,
                    total_requests: samples.total,
                    failed_requests: samples.failed,
                }
            })
            .collect();
        result.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));

        GatewayMetrics {
            gateway_name: self.gateway_name.clone(),
            endpoints: result,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_endpoints_separately() {
        let collector = MetricsCollector::new("test");

        collector
            .record_request("coins_markets", Duration::from_millis(100), true)
            .await;
        collector
            .record_request("coins_markets", Duration::from_millis(200), true)
            .await;
        collector
            .record_request("coins_markets", Duration::from_millis(150), false)
            .await;
        collector
            .record_request("search", Duration::from_millis(50), true)
            .await;

        let metrics = collector.snapshot().await;
        assert_eq!(metrics.gateway_name, "test");
        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(metrics.failed_requests(), 1);

        let markets = metrics.endpoint("coins_markets").unwrap();
        assert_eq!(markets.total_requests, 3);
        assert!(markets.success_rate > 0.6 && markets.success_rate < 0.7);
        assert_eq!(metrics.endpoint("search").unwrap().success_rate, 1.0);
    }

    #[test]
    fn test_percentile() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 9.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
