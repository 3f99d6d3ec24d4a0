//! Common types for metrics definitions.
//!
//! Each crate declares its metrics as `MetricDef` consts plus an
//! `ALL_METRICS` slice, and emits through the macros below so that the
//! definition site and the emission site cannot drift apart.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

/// Registers descriptions with the `metrics` recorder so exporters can
/// surface them. Safe to call before any recorder is installed.
pub fn register_all(defs: &[MetricDef]) {
    for def in defs {
        match def.metric_type {
            MetricType::Counter => metrics::describe_counter!(def.name, def.description),
            MetricType::Gauge => metrics::describe_gauge!(def.name, def.description),
            MetricType::Histogram => metrics::describe_histogram!(def.name, def.description),
        }
    }
}

#[macro_export]
macro_rules! counter {
    ($def:expr) => {
        metrics::counter!($def.name)
    };
    ($def:expr, $($tag_key:expr => $tag_val:expr),+) => {
        metrics::counter!($def.name, $($tag_key => $tag_val),+)
    };
}

#[macro_export]
macro_rules! gauge {
    ($def:expr) => {
        metrics::gauge!($def.name)
    };
}

#[macro_export]
macro_rules! histogram {
    ($def:expr) => {
        metrics::histogram!($def.name)
    };
    ($def:expr, $($tag_key:expr => $tag_val:expr),+) => {
        metrics::histogram!($def.name, $($tag_key => $tag_val),+)
    };
}
