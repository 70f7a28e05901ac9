use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, GaugeVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Prometheus metrics for the catalog service
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // HTTP metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub http_requests_in_flight: GaugeVec,

    // Business logic metrics
    pub catalog_queries_total: CounterVec,
    pub rating_operations_total: CounterVec,
    pub recommendation_requests_total: CounterVec,
    pub file_uploads_total: CounterVec,
}

impl Metrics {
    /// Create a new metrics instance with all required metrics registered
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total number of HTTP requests processed",
            ),
            &["method", "endpoint", "status_code"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "endpoint"],
        )?;

        let http_requests_in_flight = GaugeVec::new(
            Opts::new(
                "http_requests_in_flight",
                "Number of HTTP requests currently being processed",
            ),
            &["method", "endpoint"],
        )?;

        let catalog_queries_total = CounterVec::new(
            Opts::new(
                "catalog_queries_total",
                "Total number of catalog query engine invocations",
            ),
            &["collection", "sort_by", "status"],
        )?;

        let rating_operations_total = CounterVec::new(
            Opts::new(
                "rating_operations_total",
                "Total number of rating write operations",
            ),
            &["operation", "target_kind", "status"],
        )?;

        let recommendation_requests_total = CounterVec::new(
            Opts::new(
                "recommendation_requests_total",
                "Total number of recommendation requests",
            ),
            &["kind", "status"],
        )?;

        let file_uploads_total = CounterVec::new(
            Opts::new("file_uploads_total", "Total number of file uploads"),
            &["category", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(catalog_queries_total.clone()))?;
        registry.register(Box::new(rating_operations_total.clone()))?;
        registry.register(Box::new(recommendation_requests_total.clone()))?;
        registry.register(Box::new(file_uploads_total.clone()))?;

        info!("Prometheus metrics initialized");

        Ok(Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            catalog_queries_total,
            rating_operations_total,
            recommendation_requests_total,
            file_uploads_total,
        })
    }

    /// Get the metrics registry for exposing metrics endpoint
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    /// Record HTTP request metrics
    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        let status_str = status_code.to_string();

        self.http_requests_total
            .with_label_values(&[method, endpoint, &status_str])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_seconds);
    }

    /// Record a catalog query engine invocation
    pub fn record_catalog_query(&self, collection: &str, sort_by: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.catalog_queries_total
            .with_label_values(&[collection, sort_by, status])
            .inc();
    }

    /// Record a rating write (create/update/delete)
    pub fn record_rating_operation(&self, operation: &str, target_kind: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.rating_operations_total
            .with_label_values(&[operation, target_kind, status])
            .inc();
    }

    /// Record a recommendation request
    pub fn record_recommendation_request(&self, kind: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.recommendation_requests_total
            .with_label_values(&[kind, status])
            .inc();
    }

    /// Record a file upload attempt
    pub fn record_file_upload(&self, category: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.file_uploads_total
            .with_label_values(&[category, status])
            .inc();
    }

    /// Increment in-flight requests
    pub fn increment_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .inc();
    }

    /// Decrement in-flight requests
    pub fn decrement_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .dec();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        assert!(Metrics::new().is_ok());
    }

    #[test]
    fn test_http_request_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_http_request("GET", "/food-items", 200, 0.123);
        metrics.record_http_request("POST", "/ratings", 201, 0.456);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("http_requests_total"));
        assert!(encoded.contains("http_request_duration_seconds"));
    }

    #[test]
    fn test_business_metrics_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_catalog_query("food_items", "rating", true);
        metrics.record_rating_operation("create", "food_item", true);
        metrics.record_recommendation_request("personalized", true);
        metrics.record_file_upload("food_images", false);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("catalog_queries_total"));
        assert!(encoded.contains("rating_operations_total"));
        assert!(encoded.contains("recommendation_requests_total"));
        assert!(encoded.contains("file_uploads_total"));
    }

    #[test]
    fn test_in_flight_requests() {
        let metrics = Metrics::new().unwrap();

        metrics.increment_in_flight("GET", "/food-items");
        metrics.increment_in_flight("GET", "/food-items");
        metrics.decrement_in_flight("GET", "/food-items");

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("http_requests_in_flight"));
    }
}
