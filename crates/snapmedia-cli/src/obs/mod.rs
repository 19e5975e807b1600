//! In-process decode metrics, rendered in Prometheus text format at the end
//! of a batch run.

pub mod metrics;

pub use metrics::DecodeMetrics;
