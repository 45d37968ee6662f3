//! Metrics for the fix engine
//!
//! Each engine phase defines its metrics in a dedicated submodule. Recording
//! is always safe: without an installed recorder the `metrics` macros are
//! no-ops, so the library never requires [`init_metrics`].

pub mod pipeline;
pub mod registry;
pub mod resolver;

pub use pipeline::PipelineMetrics;
pub use resolver::ResolverMetrics;

use std::sync::{Once, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install an in-process Prometheus recorder and register every phase metric.
///
/// Idempotent. Returns the handle used to render the text exposition, or
/// `None` if the recorder could not be installed (e.g. another recorder is
/// already global).
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Metrics handle was already set");
            }
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    });
    HANDLE.get()
}

/// Render the current metrics in Prometheus text format, if installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(PrometheusHandle::render)
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Touch every metric of the phase so it shows up before first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Metric names follow `cmor_fixes_{phase}_{name}[_total]`.
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("cmor_fixes_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("cmor_fixes_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
