//! Metrics collection for observability

use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Gateway metrics
    pub gateway_requests: CounterVec,
    pub gateway_request_duration: HistogramVec,

    // Summarization metrics
    pub summarizations: CounterVec,
    pub chunks_summarized: Counter,

    // Section metrics
    pub sections_located: CounterVec,

    // Question answering metrics
    pub questions: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let gateway_requests = register_counter_vec_with_registry!(
            Opts::new("gateway_requests_total", "Total language model requests"),
            &["status"],
            registry
        )?;

        let gateway_request_duration = register_histogram_vec_with_registry!(
            "gateway_request_duration_seconds",
            "Language model request duration in seconds",
            &["status"],
            registry
        )?;

        let summarizations = register_counter_vec_with_registry!(
            Opts::new("summarizations_total", "Summarizations by path"),
            &["path"],
            registry
        )?;

        let chunks_summarized = register_counter_with_registry!(
            Opts::new("chunks_summarized_total", "Chunks summarized on the hierarchical path"),
            registry
        )?;

        let sections_located = register_counter_vec_with_registry!(
            Opts::new("sections_located_total", "Section lookups by outcome"),
            &["outcome"],
            registry
        )?;

        let questions = register_counter_vec_with_registry!(
            Opts::new("questions_total", "Questions by outcome"),
            &["outcome"],
            registry
        )?;

        Ok(Self {
            registry,
            gateway_requests,
            gateway_request_duration,
            summarizations,
            chunks_summarized,
            sections_located,
            questions,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a finished gateway request
    pub fn record_gateway_request(&self, success: bool, seconds: f64) {
        let status = if success { "success" } else { "error" };
        self.gateway_requests.with_label_values(&[status]).inc();
        self.gateway_request_duration
            .with_label_values(&[status])
            .observe(seconds);
    }

    /// Record a summarization; `path` is `section`, `direct` or `hierarchical`
    pub fn record_summarization(&self, path: &str) {
        self.summarizations.with_label_values(&[path]).inc();
    }

    /// Record a section lookup
    pub fn record_section(&self, found: bool) {
        let outcome = if found { "found" } else { "absent" };
        self.sections_located.with_label_values(&[outcome]).inc();
    }

    /// Record a question; `outcome` is `answered`, `not_ready`, `invalid` or `error`
    pub fn record_question(&self, outcome: &str) {
        self.questions.with_label_values(&[outcome]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
