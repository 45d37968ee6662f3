//! Pipeline phase metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};
use crate::pipeline::stage::FixStage;

pub struct PipelineMetrics;

impl PipelineMetrics {
    pub fn record_run_success(duration_secs: f64) {
        ::metrics::counter!(phase_metric!(counter, "pipeline", "runs_success")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "pipeline", "run_duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_run_error(stage: FixStage) {
        let name = phase_metric!(counter, "pipeline", "runs_error");
        ::metrics::counter!(name, "stage" => stage.as_str()).increment(1);
    }

    pub fn record_stage_applied(stage: FixStage) {
        let name = phase_metric!(counter, "pipeline", "stages_applied");
        ::metrics::counter!(name, "stage" => stage.as_str()).increment(1);
    }

    pub fn record_partial_file_removed() {
        ::metrics::counter!(phase_metric!(counter, "pipeline", "partial_files_removed"))
            .increment(1);
    }
}

impl PhaseMetrics for PipelineMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "pipeline", "runs_success"));
        let _ = counter!(phase_metric!(counter, "pipeline", "runs_error"));
        let _ = counter!(phase_metric!(counter, "pipeline", "stages_applied"));
        let _ = counter!(phase_metric!(counter, "pipeline", "partial_files_removed"));
        let _ = histogram!(phase_metric!(histogram, "pipeline", "run_duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "pipeline"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "pipeline", "runs_success"),
                metric_type: MetricType::Counter,
                help: "Pipeline runs that completed every stage",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "pipeline", "runs_error"),
                metric_type: MetricType::Counter,
                help: "Pipeline runs aborted by a failing stage",
                labels: vec!["stage"],
            },
            MetricDoc {
                name: phase_metric!(counter, "pipeline", "stages_applied"),
                metric_type: MetricType::Counter,
                help: "Individual fix stages applied",
                labels: vec!["stage"],
            },
            MetricDoc {
                name: phase_metric!(counter, "pipeline", "partial_files_removed"),
                metric_type: MetricType::Counter,
                help: "Partial or intermediate fixed files removed",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "pipeline", "run_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of successful pipeline runs in seconds",
                labels: vec![],
            },
        ]
    }
}
