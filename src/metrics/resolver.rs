//! Resolver phase metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ResolverMetrics;

impl ResolverMetrics {
    /// Record one resolution and the length of the chain it produced
    pub fn record_chain_resolved(chain_len: usize) {
        ::metrics::counter!(phase_metric!(counter, "resolver", "resolutions")).increment(1);
        if chain_len == 0 {
            ::metrics::counter!(phase_metric!(counter, "resolver", "empty_chains")).increment(1);
        }
        ::metrics::histogram!(phase_metric!(histogram, "resolver", "chain_length"))
            .record(chain_len as f64);
    }
}

impl PhaseMetrics for ResolverMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "resolver", "resolutions"));
        let _ = counter!(phase_metric!(counter, "resolver", "empty_chains"));
        let _ = histogram!(phase_metric!(histogram, "resolver", "chain_length"));
    }

    fn phase_name() -> &'static str {
        "resolver"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "resolver", "resolutions"),
                metric_type: MetricType::Counter,
                help: "Total number of fix chain resolutions",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "resolver", "empty_chains"),
                metric_type: MetricType::Counter,
                help: "Resolutions that found no fixes",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "resolver", "chain_length"),
                metric_type: MetricType::Histogram,
                help: "Number of fixes in each resolved chain",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_use_phase_prefix() {
        for doc in ResolverMetrics::metrics_documentation() {
            assert!(doc.name.starts_with("cmor_fixes_resolver_"), "{}", doc.name);
        }
    }

    #[test]
    fn test_recording_without_recorder_is_harmless() {
        ResolverMetrics::record_chain_resolved(0);
        ResolverMetrics::record_chain_resolved(2);
    }
}
