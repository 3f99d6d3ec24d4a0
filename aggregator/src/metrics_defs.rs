use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "HTTP request duration in seconds. Tagged with status.",
};

pub const SEARCH_DURATION: MetricDef = MetricDef {
    name: "search.duration",
    metric_type: MetricType::Histogram,
    description: "Provider fan-out duration in seconds, cache misses only",
};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "search.cache_hit",
    metric_type: MetricType::Counter,
    description: "Searches answered from the result cache",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "search.cache_miss",
    metric_type: MetricType::Counter,
    description: "Searches that went to the providers",
};

pub const PROVIDER_FAILURES: MetricDef = MetricDef {
    name: "search.provider_failures",
    metric_type: MetricType::Counter,
    description: "Provider searches that returned an error. Tagged with provider.",
};

pub const PROVIDERS_ABORTED: MetricDef = MetricDef {
    name: "search.providers_aborted",
    metric_type: MetricType::Counter,
    description: "Provider searches aborted at the request deadline",
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUEST_DURATION,
    SEARCH_DURATION,
    CACHE_HIT,
    CACHE_MISS,
    PROVIDER_FAILURES,
    PROVIDERS_ABORTED,
];
