use chrono::{DateTime, Utc};
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Outbound call, e.g. component `sanity`, action `query`, endpoint `data/query`.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct CallLabel {
    pub component: String,
    pub action: String,
    pub endpoint: String,
}

impl CallLabel {
    pub fn new(component: &str, action: &str, endpoint: &str) -> Self {
        Self {
            component: component.to_string(),
            action: action.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

/// Rate, errors and duration of calls to the content store and the drop gateway.
#[derive(Debug, Clone)]
pub struct RequestErrorDurationMetrics {
    requests: Family<CallLabel, Counter>,
    errors: Family<CallLabel, Counter>,
    durations: Family<CallLabel, Histogram>,
}

impl Default for RequestErrorDurationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestErrorDurationMetrics {
    pub fn new() -> Self {
        Self {
            requests: Family::default(),
            errors: Family::default(),
            // 5 ms .. ~40 s
            durations: Family::new_with_constructor(|| {
                Histogram::new(exponential_buckets(5.0, 2.0, 14))
            }),
        }
    }

    /// Records one finished call started at `start_time`, counting it as an
    /// error when `failed` is set.
    pub fn observe_call(&self, label: &CallLabel, start_time: DateTime<Utc>, failed: bool) {
        let elapsed = Utc::now().signed_duration_since(start_time);
        self.requests.get_or_create(label).inc();
        self.durations
            .get_or_create(label)
            .observe(elapsed.num_milliseconds() as f64);
        if failed {
            self.errors.get_or_create(label).inc();
        }
    }

    pub fn requests(&self, label: &CallLabel) -> u64 {
        self.requests.get_or_create(label).get()
    }

    pub fn errors(&self, label: &CallLabel) -> u64 {
        self.errors.get_or_create(label).get()
    }

    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "outbound_requests",
            "Number of outbound calls per component, action and endpoint",
            self.requests.clone(),
        );
        registry.register(
            "outbound_errors",
            "Number of failed outbound calls per component, action and endpoint",
            self.errors.clone(),
        );
        registry.register(
            "outbound_request_duration",
            "Duration of outbound calls in milliseconds",
            self.durations.clone(),
        );
    }
}
