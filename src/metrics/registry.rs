//! Registers every phase's metrics and reports naming conflicts.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::metrics::{MetricDoc, PhaseMetrics};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::resolver::ResolverMetrics>(&mut all_metrics);
    register_phase_metrics::<super::pipeline::PipelineMetrics>(&mut all_metrics);

    info!("Registered {} metrics across all phases", all_metrics.len());
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict: '{}' registered again by phase '{}'",
                doc.name, phase_name
            );
        } else {
            debug!(
                "  - {} ({:?}) [{}]: {}",
                doc.name,
                doc.metric_type,
                doc.labels.join(", "),
                doc.help
            );
            all_metrics.insert(doc.name, doc);
        }
    }
}
