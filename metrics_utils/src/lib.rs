pub mod errors;
pub mod red;
pub mod utils;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

use crate::red::RequestErrorDurationMetrics;

#[derive(Debug)]
pub struct MetricState {
    pub storefront_metrics: Arc<StorefrontMetricsConfig>,
    pub red_metrics: Arc<RequestErrorDurationMetrics>,
    pub registry: Registry,
}

impl MetricState {
    pub fn new() -> Self {
        Self {
            storefront_metrics: Arc::new(StorefrontMetricsConfig::new()),
            red_metrics: Arc::new(RequestErrorDurationMetrics::new()),
            registry: Registry::default(),
        }
    }
}

impl Default for MetricState {
    fn default() -> Self {
        Self::new()
    }
}

pub trait MetricsTrait {
    fn register_metrics(&mut self);
}

impl MetricsTrait for MetricState {
    fn register_metrics(&mut self) {
        self.storefront_metrics.start_time();
        self.storefront_metrics.register(&mut self.registry);
        self.red_metrics.register(&mut self.registry);
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RouteLabel {
    pub route: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum MetricStatus {
    SUCCESS,
    FAILURE,
    SKIPPED,
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricStatus::SUCCESS => write!(f, "success"),
            MetricStatus::FAILURE => write!(f, "failure"),
            MetricStatus::SKIPPED => write!(f, "skipped"),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MintLabel {
    pub status: MetricStatus,
    // failure class, empty on success
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct StorefrontMetricsConfig {
    page_requests: Family<RouteLabel, Counter>,
    page_latency: Family<RouteLabel, Histogram>,
    mint_attempts: Family<MintLabel, Counter>,
    start_time: Gauge,
}

impl StorefrontMetricsConfig {
    pub fn new() -> Self {
        Self {
            page_requests: Family::<RouteLabel, Counter>::default(),
            page_latency: Family::<RouteLabel, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(20.0, 1.8, 10))
            }),
            mint_attempts: Family::<MintLabel, Counter>::default(),
            start_time: Default::default(),
        }
    }

    pub fn inc_page_requests(&self, route: &str) -> u64 {
        self.page_requests
            .get_or_create(&RouteLabel {
                route: route.to_owned(),
            })
            .inc()
    }

    pub fn set_page_latency(&self, route: &str, duration: f64) {
        self.page_latency
            .get_or_create(&RouteLabel {
                route: route.to_owned(),
            })
            .observe(duration);
    }

    pub fn inc_mint_attempts(&self, status: MetricStatus, reason: &str) -> u64 {
        self.mint_attempts
            .get_or_create(&MintLabel {
                status,
                reason: reason.to_owned(),
            })
            .inc()
    }

    pub fn mint_attempts(&self, status: MetricStatus, reason: &str) -> u64 {
        self.mint_attempts
            .get_or_create(&MintLabel {
                status,
                reason: reason.to_owned(),
            })
            .get()
    }

    pub fn start_time(&self) -> i64 {
        self.start_time.set(Utc::now().timestamp())
    }

    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "storefront_page_requests",
            "The number of page requests per route",
            self.page_requests.clone(),
        );
        registry.register(
            "storefront_page_latency",
            "A histogram of page rendering duration in milliseconds",
            self.page_latency.clone(),
        );
        registry.register(
            "storefront_mint_attempts",
            "The number of mint attempts by outcome",
            self.mint_attempts.clone(),
        );
        registry.register(
            "storefront_start_time",
            "Binary start time",
            self.start_time.clone(),
        );
    }
}

impl Default for StorefrontMetricsConfig {
    fn default() -> Self {
        Self::new()
    }
}
