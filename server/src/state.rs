use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cantonal_shared::{IngestConfig, NormalizeRules};
use tracing::warn;

use crate::config::{
    map_min_regions, map_sources, static_dir, upstream_connect_timeout, upstream_http_timeout,
};

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    /// Upstream map documents, in priority order.
    pub map_sources: Arc<Vec<String>>,
    pub ingest_config: Arc<IngestConfig>,
    pub static_dir: Arc<str>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    proxy_requests_total: AtomicU64,
    probe_requests_total: AtomicU64,
    upstream_errors_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub proxy_requests_total: u64,
    pub probe_requests_total: u64,
    pub upstream_errors_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            proxy_requests_total: self.proxy_requests_total.load(Ordering::Relaxed),
            probe_requests_total: self.probe_requests_total.load(Ordering::Relaxed),
            upstream_errors_total: self.upstream_errors_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_proxy_request(&self) {
        self.proxy_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe_request(&self) {
        self.probe_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_errors(&self, count: u64) {
        self.upstream_errors_total
            .fetch_add(count, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new() -> Self {
        let ingest_config = IngestConfig {
            rules: NormalizeRules::default(),
            min_regions: map_min_regions(),
        };
        Self::with_sources(map_sources(), ingest_config)
    }

    pub fn with_sources(map_sources: Vec<String>, ingest_config: IngestConfig) -> Self {
        let request_timeout = upstream_http_timeout();
        let connect_timeout = upstream_connect_timeout();
        let http_client = reqwest::Client::builder()
            .user_agent("cantonal-map/0.1")
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .or_else(|e| {
                warn!(
                    error = %e,
                    "failed to build configured HTTP client, retrying without custom user-agent"
                );
                reqwest::Client::builder()
                    .timeout(request_timeout)
                    .connect_timeout(connect_timeout)
                    .build()
            })
            .unwrap_or_else(|e| {
                panic!("failed to build timeout-configured HTTP client: {e}");
            });
        Self {
            http_client,
            map_sources: Arc::new(map_sources),
            ingest_config: Arc::new(ingest_config),
            static_dir: Arc::from(static_dir()),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}
