//! # Prometheus Metrics — Exposition for Container Orchestration
//!
//! Exposes dialqueue operational metrics in the Prometheus text exposition
//! format for scraping by Prometheus, Grafana Agent, or any
//! OpenMetrics-compatible collector.
//!
//! ## Metrics Exposed
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `dialqueue_http_request_duration_seconds` | Histogram | `method`, `path` | Request latency |
//! | `dialqueue_numbers_seeded_total` | Counter | — | Candidate rows inserted by seeding |
//! | `dialqueue_dispositions_recorded_total` | Counter | `outcome` | Dispositions applied, by resulting status |
//! | `dialqueue_db_pool_active` | Gauge | — | Checked-out pool connections |
//! | `dialqueue_db_pool_idle` | Gauge | — | Idle pool connections |
//! | `dialqueue_db_pool_max` | Gauge | — | Configured pool ceiling |
//!
//! The HTTP histogram is updated by the request middleware; pool gauges are
//! refreshed on each `/metrics` scrape.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Label set for the HTTP request duration histogram.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

/// Label set for disposition counters (`failed` / `verified`).
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct OutcomeLabel {
    pub outcome: String,
}

/// Thread-safe metrics registry for the dialqueue service.
///
/// All fields use atomic types and are safe to update from any thread or
/// async task. The `Family` type creates per-label-set instances on first
/// use.
pub struct Metrics {
    pub registry: Registry,
    pub http_request_duration: Family<HttpLabel, Histogram>,
    pub numbers_seeded: Counter,
    pub dispositions_recorded: Family<OutcomeLabel, Counter>,
    pub db_pool_active: Gauge,
    pub db_pool_idle: Gauge,
    pub db_pool_max: Gauge,
}

impl Metrics {
    /// Create a new metrics registry with all dialqueue metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_request_duration = Family::<HttpLabel, Histogram>::new_with_constructor(|| {
            Histogram::new(exponential_buckets(0.001, 2.0, 14))
        });
        registry.register(
            "dialqueue_http_request_duration_seconds",
            "HTTP request duration in seconds",
            http_request_duration.clone(),
        );

        let numbers_seeded = Counter::default();
        registry.register(
            "dialqueue_numbers_seeded",
            "Candidate rows inserted by seed calls",
            numbers_seeded.clone(),
        );

        let dispositions_recorded = Family::<OutcomeLabel, Counter>::default();
        registry.register(
            "dialqueue_dispositions_recorded",
            "Dispositions applied, labeled by resulting status",
            dispositions_recorded.clone(),
        );

        let db_pool_active = Gauge::default();
        registry.register(
            "dialqueue_db_pool_active",
            "Checked-out database pool connections",
            db_pool_active.clone(),
        );

        let db_pool_idle = Gauge::default();
        registry.register(
            "dialqueue_db_pool_idle",
            "Idle database pool connections",
            db_pool_idle.clone(),
        );

        let db_pool_max = Gauge::default();
        registry.register(
            "dialqueue_db_pool_max",
            "Configured database pool ceiling",
            db_pool_max.clone(),
        );

        Self {
            registry,
            http_request_duration,
            numbers_seeded,
            dispositions_recorded,
            db_pool_active,
            db_pool_idle,
            db_pool_max,
        }
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        encode(&mut buf, &self.registry).expect("encoding metrics should not fail");
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_encode_returns_valid_text() {
        let m = Metrics::new();
        m.numbers_seeded.inc_by(3);
        m.db_pool_max.set(5);
        m.dispositions_recorded
            .get_or_create(&OutcomeLabel {
                outcome: "verified".to_string(),
            })
            .inc();

        let output = m.encode();
        assert!(output.contains("dialqueue_numbers_seeded"));
        assert!(output.contains("dialqueue_db_pool_max"));
        assert!(output.contains("dialqueue_dispositions_recorded"));
        assert!(output.contains("verified"));
    }

    #[test]
    fn histogram_observes_without_panic() {
        let m = Metrics::new();
        m.http_request_duration
            .get_or_create(&HttpLabel {
                method: "GET".to_string(),
                path: "/next-number".to_string(),
            })
            .observe(0.012);
        let output = m.encode();
        assert!(output.contains("dialqueue_http_request_duration_seconds"));
    }
}
