//! Prometheus metrics for the gateway.
//!
//! The registry is owned by the gateway state rather than the process-global
//! default registry, so every router (and every test) gets its own counters.

use std::time::Duration;

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

/// Request counter and latency histogram for `/weather/{city}`.
///
/// Cloning is cheap: all handles share the same underlying atomics.
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    /// Every weather lookup attempt, successful or not.
    requests_total: IntCounter,
    /// Wall-clock duration of successful lookups only.
    request_duration: Histogram,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total =
            IntCounter::new("weather_requests_total", "Total weather requests")?;
        let request_duration = Histogram::with_opts(HistogramOpts::new(
            "request_duration_seconds",
            "Request duration",
        ))?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self { registry, requests_total, request_duration })
    }

    pub fn record_request(&self) {
        self.requests_total.inc();
    }

    pub fn observe_duration(&self, elapsed: Duration) {
        self.request_duration.observe(elapsed.as_secs_f64());
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.get()
    }

    pub fn duration_sample_count(&self) -> u64 {
        self.request_duration.get_sample_count()
    }

    /// Content type of [`Self::render`]'s output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Encode all registered metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registry_starts_at_zero() {
        let metrics = GatewayMetrics::new().unwrap();
        assert_eq!(metrics.requests_total(), 0);
        assert_eq!(metrics.duration_sample_count(), 0);
    }

    #[test]
    fn registries_are_independent() {
        let a = GatewayMetrics::new().unwrap();
        let b = GatewayMetrics::new().unwrap();

        a.record_request();
        a.record_request();

        assert_eq!(a.requests_total(), 2);
        assert_eq!(b.requests_total(), 0);
    }

    #[test]
    fn render_exposes_counter_and_histogram() {
        let metrics = GatewayMetrics::new().unwrap();
        metrics.record_request();
        metrics.record_request();
        metrics.record_request();
        metrics.observe_duration(Duration::from_millis(120));

        let text = metrics.render().unwrap();

        assert!(text.contains("# TYPE weather_requests_total counter"));
        assert!(text.contains("weather_requests_total 3"));
        assert!(text.contains("# TYPE request_duration_seconds histogram"));
        assert!(text.contains("request_duration_seconds_count 1"));
        assert!(text.contains("request_duration_seconds_bucket{le=\"0.25\"} 1"));
    }

    #[test]
    fn content_type_is_text_exposition() {
        let metrics = GatewayMetrics::new().unwrap();
        assert!(metrics.content_type().starts_with("text/plain"));
    }
}
