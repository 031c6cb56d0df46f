use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use configs::MetricsConfig;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use anyhow::{anyhow, Context};
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

/// Destination for counter snapshots.
pub trait MetricsSink: Send + Sync {
    fn record(&self, measurement: &'static str, value: i64);
}

/// Writes InfluxDB 1.x line protocol (`<measurement> value=<n>i`). Each write
/// runs on its own task; failures are logged and dropped.
pub struct InfluxSink {
    client: Client,
    write_url: Url,
    query_url: Url,
    database: String,
}

fn endpoint(base: &Url, path: &str) -> anyhow::Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("influx url {base} cannot carry a path"))?
        .pop_if_empty()
        .push(path);
    Ok(url)
}

impl InfluxSink {
    pub fn new(cfg: &MetricsConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;
        let base = Url::parse(&cfg.influx_url).with_context(|| format!("invalid influx url {}", cfg.influx_url))?;
        let mut write_url = endpoint(&base, "write")?;
        write_url.query_pairs_mut().append_pair("db", &cfg.database);
        Ok(Self {
            client,
            write_url,
            query_url: endpoint(&base, "query")?,
            database: cfg.database.clone(),
        })
    }

    /// `CREATE DATABASE` is a no-op when the database already exists.
    pub async fn ensure_database(&self) -> Result<(), reqwest::Error> {
        self.client
            .post(self.query_url.clone())
            .form(&[("q", format!("CREATE DATABASE \"{}\"", self.database))])
            .send()
            .await?
            .error_for_status()?;
        info!(database = %self.database, "influx database ready");
        Ok(())
    }
}

pub fn line(measurement: &str, value: i64) -> String {
    format!("{measurement} value={value}i")
}

impl MetricsSink for InfluxSink {
    fn record(&self, measurement: &'static str, value: i64) {
        let client = self.client.clone();
        let url = self.write_url.clone();
        let body = line(measurement, value);
        tokio::spawn(async move {
            match client.post(url).body(body).send().await {
                Ok(res) if res.status().is_success() => debug!(measurement, value, "metric written"),
                Ok(res) => warn!(measurement, status = %res.status(), "influx rejected metric"),
                Err(e) => warn!(measurement, error = %e, "influx write failed"),
            }
        });
    }
}

pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _measurement: &'static str, _value: i64) {}
}

/// Keeps every point in memory.
#[derive(Default)]
pub struct RecordingSink {
    points: Mutex<Vec<(&'static str, i64)>>,
}

impl RecordingSink {
    pub fn points(&self) -> Vec<(&'static str, i64)> {
        self.points.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, measurement: &'static str, value: i64) {
        if let Ok(mut points) = self.points.lock() {
            points.push((measurement, value));
        }
    }
}

/// Gateway counters. Each change is mirrored to the sink.
pub struct BusinessMetrics {
    registry: Registry,
    categories_created: IntCounter,
    houses_listed: IntGauge,
    sink: Arc<dyn MetricsSink>,
}

impl BusinessMetrics {
    pub fn new(sink: Arc<dyn MetricsSink>) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let categories_created = IntCounter::new(
            "business_categories_created_total",
            "Categories created through business-service",
        )?;
        let houses_listed = IntGauge::new(
            "business_houses_listed",
            "Listings created minus listings deleted since start",
        )?;
        registry.register(Box::new(categories_created.clone()))?;
        registry.register(Box::new(houses_listed.clone()))?;
        Ok(Self { registry, categories_created, houses_listed, sink })
    }

    pub fn category_created(&self) {
        self.categories_created.inc();
        self.sink.record("categories", self.categories_created.get() as i64);
    }

    pub fn house_listed(&self) {
        self.houses_listed.inc();
        self.sink.record("products", self.houses_listed.get());
    }

    pub fn house_removed(&self) {
        self.houses_listed.dec();
        self.sink.record("products", self.houses_listed.get());
    }

    pub fn categories_created(&self) -> u64 {
        self.categories_created.get()
    }

    pub fn houses_listed(&self) -> i64 {
        self.houses_listed.get()
    }

    /// Prometheus text exposition of this registry.
    pub fn encode(&self) -> (StatusCode, String) {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
        }
        (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_mirrored_to_sink() {
        let sink = Arc::new(RecordingSink::default());
        let metrics = BusinessMetrics::new(sink.clone()).unwrap();
        metrics.category_created();
        metrics.house_listed();
        metrics.house_listed();
        metrics.house_removed();

        assert_eq!(metrics.categories_created(), 1);
        assert_eq!(metrics.houses_listed(), 1);
        assert_eq!(
            sink.points(),
            vec![("categories", 1), ("products", 1), ("products", 2), ("products", 1)]
        );
    }

    #[test]
    fn registries_are_per_instance() {
        let a = BusinessMetrics::new(Arc::new(NoopSink)).unwrap();
        let b = BusinessMetrics::new(Arc::new(NoopSink)).unwrap();
        a.house_listed();
        assert_eq!(b.houses_listed(), 0);
        let (status, body) = a.encode();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("business_houses_listed 1"));
    }

    fn metrics_config(url: &str, database: &str) -> MetricsConfig {
        MetricsConfig { influx_url: url.into(), database: database.into(), ..MetricsConfig::default() }
    }

    #[test]
    fn influx_urls_encode_database_name() {
        let sink = InfluxSink::new(&metrics_config("http://influxdb:8086/", "my db&x")).unwrap();
        assert_eq!(sink.write_url.as_str(), "http://influxdb:8086/write?db=my+db%26x");
        assert_eq!(sink.query_url.as_str(), "http://influxdb:8086/query");

        let sink = InfluxSink::new(&metrics_config("http://influxdb:8086/influx", "idp")).unwrap();
        assert_eq!(sink.write_url.as_str(), "http://influxdb:8086/influx/write?db=idp");
    }

    #[test]
    fn influx_url_must_parse() {
        assert!(InfluxSink::new(&metrics_config("not a url", "idp")).is_err());
    }

    #[test]
    fn line_protocol_uses_integer_field() {
        assert_eq!(line("products", 3), "products value=3i");
    }
}
