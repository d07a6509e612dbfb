//! Query metrics and tracing span helpers.
//!
//! With the `metrics` feature, [`METRICS`] records statements, failures,
//! durations and transactions through OpenTelemetry instruments. They are
//! exported into a private Prometheus registry; [`QueryMetrics::render`]
//! returns the text exposition format for a scrape endpoint.

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Counter, Histogram, MeterProvider as _};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::metrics::SdkMeterProvider;
#[cfg(feature = "metrics")]
use prometheus::{Registry, TextEncoder};
#[cfg(feature = "metrics")]
use std::time::Duration;

#[cfg(feature = "metrics")]
pub static METRICS: Lazy<QueryMetrics> = Lazy::new(QueryMetrics::init);

#[cfg(feature = "metrics")]
pub struct QueryMetrics {
    pub registry: Registry,
    pub queries_total: Counter<u64>,
    pub query_errors_total: Counter<u64>,
    pub query_duration: Histogram<f64>,
    pub transactions_total: Counter<u64>,
    // keeps the exporter's reader registered
    _provider: SdkMeterProvider,
}

#[cfg(feature = "metrics")]
impl QueryMetrics {
    pub fn init() -> Self {
        let registry = Registry::new();
        let provider = match opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()
        {
            Ok(exporter) => SdkMeterProvider::builder().with_reader(exporter).build(),
            Err(e) => {
                log::warn!("Prometheus exporter unavailable, metrics are not exported: {}", e);
                SdkMeterProvider::builder().build()
            }
        };
        let meter = provider.meter("sqlwright");

        let queries_total = meter
            .u64_counter("sqlwright_queries_total")
            .with_description("Total statements executed")
            .build();

        let query_errors_total = meter
            .u64_counter("sqlwright_query_errors_total")
            .with_description("Statements that failed")
            .build();

        let query_duration = meter
            .f64_histogram("sqlwright_query_duration_seconds")
            .with_description("Duration of statements")
            .build();

        let transactions_total = meter
            .u64_counter("sqlwright_transactions_total")
            .with_description("Transactions started")
            .build();

        Self {
            registry,
            queries_total,
            query_errors_total,
            query_duration,
            transactions_total,
            _provider: provider,
        }
    }

    /// Count one executed statement and its duration
    pub fn record_query(&self, elapsed: Duration) {
        self.queries_total.add(1, &[]);
        self.query_duration.record(elapsed.as_secs_f64(), &[]);
    }

    pub fn record_query_error(&self) {
        self.query_errors_total.add(1, &[]);
    }

    pub fn record_transaction(&self) {
        self.transactions_total.add(1, &[]);
    }

    /// Current values in the Prometheus text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

/// Span constructors shared by the backend and transactions
#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{debug_span, info_span, Span};

    pub fn execute_query_span(sql: &str) -> Span {
        debug_span!("sqlwright.execute", db.system = "sqlite", db.statement = sql)
    }

    pub fn open_database_span(path: &str) -> Span {
        info_span!("sqlwright.open", db.system = "sqlite", db.name = path)
    }

    pub fn begin_transaction_span() -> Span {
        debug_span!("sqlwright.transaction.begin")
    }

    pub fn commit_transaction_span() -> Span {
        debug_span!("sqlwright.transaction.commit")
    }

    pub fn rollback_transaction_span() -> Span {
        debug_span!("sqlwright.transaction.rollback")
    }
}
