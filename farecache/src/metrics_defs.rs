use shared::metrics_defs::{MetricDef, MetricType};

pub const PAYLOAD_BYTES: MetricDef = MetricDef {
    name: "cache.payload_bytes",
    metric_type: MetricType::Histogram,
    description: "Stored payload size in bytes, after compression",
};

pub const DECODE_FAILURES: MetricDef = MetricDef {
    name: "cache.decode_failures",
    metric_type: MetricType::Counter,
    description: "Stored payloads that failed to decompress or decode",
};

pub const ALL_METRICS: &[MetricDef] = &[PAYLOAD_BYTES, DECODE_FAILURES];
