use std::time::Duration;

use opentelemetry::KeyValue;

use super::error::{ReportError, Stage};
use crate::assistant::{FileId, RunId, RunStatus, ThreadId};
use crate::telemetry::metrics::{
    IMAGE_UPLOAD_FAILURES, IMAGES_UPLOADED, REPORT_GENERATION_DURATION, REPORTS_TOTAL,
    RUN_POLL_ATTEMPTS, STAGE_DURATION,
};

/// Observability port handed to every pipeline stage.
///
/// All methods default to no-ops so implementations only pick what they need.
pub trait ReportObserver: Send + Sync {
    fn stage_started(&self, _stage: Stage) {}

    fn stage_finished(&self, _stage: Stage, _elapsed: Duration) {}

    fn stage_failed(&self, _stage: Stage, _error: &ReportError) {}

    fn thread_created(&self, _thread_id: &ThreadId) {}

    fn image_uploaded(&self, _index: usize, _file_id: &FileId) {}

    fn image_failed(&self, _index: usize, _error: &ReportError) {}

    fn run_polled(&self, _run_id: &RunId, _status: RunStatus, _attempt: u32) {}

    fn report_finished(&self, _elapsed: Duration, _outcome: Result<(), &ReportError>) {}
}

/// Default observer: `tracing` events plus OpenTelemetry metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ReportObserver for TracingObserver {
    fn stage_started(&self, stage: Stage) {
        tracing::debug!(pipeline.stage = stage.as_str(), "Stage started");
    }

    fn stage_finished(&self, stage: Stage, elapsed: Duration) {
        STAGE_DURATION.record(
            elapsed.as_secs_f64(),
            &[KeyValue::new("pipeline.stage", stage.as_str())],
        );
        tracing::info!(
            pipeline.stage = stage.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Stage finished"
        );
    }

    fn stage_failed(&self, stage: Stage, error: &ReportError) {
        tracing::error!(
            pipeline.stage = stage.as_str(),
            error.type = error.kind(),
            error = %error,
            "Stage failed"
        );
    }

    fn thread_created(&self, thread_id: &ThreadId) {
        tracing::info!(thread.id = %thread_id, "Assistant thread created");
    }

    fn image_uploaded(&self, index: usize, file_id: &FileId) {
        IMAGES_UPLOADED.add(1, &[]);
        tracing::info!(image.index = index, file.id = %file_id, "Image uploaded");
    }

    fn image_failed(&self, index: usize, error: &ReportError) {
        IMAGE_UPLOAD_FAILURES.add(1, &[KeyValue::new("error.type", error.kind())]);
        tracing::warn!(image.index = index, error = %error, "Image upload failed");
    }

    fn run_polled(&self, run_id: &RunId, status: RunStatus, attempt: u32) {
        RUN_POLL_ATTEMPTS.add(1, &[KeyValue::new("run.status", status.as_str())]);
        tracing::info!(
            run.id = %run_id,
            run.status = status.as_str(),
            attempt,
            "Checked run status"
        );
    }

    fn report_finished(&self, elapsed: Duration, outcome: Result<(), &ReportError>) {
        let outcome_label = match outcome {
            Ok(()) => "success",
            Err(e) => e.kind(),
        };
        REPORT_GENERATION_DURATION.record(elapsed.as_secs_f64(), &[]);
        REPORTS_TOTAL.add(1, &[KeyValue::new("report.outcome", outcome_label)]);

        match outcome {
            Ok(()) => tracing::info!(
                duration_ms = elapsed.as_millis() as u64,
                "Report generated successfully"
            ),
            Err(e) => tracing::error!(
                duration_ms = elapsed.as_millis() as u64,
                pipeline.stage = e.stage().as_str(),
                error = %e,
                "Report generation failed"
            ),
        }
    }
}
