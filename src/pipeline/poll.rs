use std::time::Duration;

use tokio::time::Instant;

use crate::assistant::{AssistantApi, RunJob, RunStatus};

use super::error::ReportError;
use super::observer::ReportObserver;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Waits on a run by re-reading its status at a fixed interval.
///
/// There is no attempt limit. Unless a deadline is set the poller only stops
/// on a terminal status or on a failed status query; query failures are not
/// retried.
#[derive(Debug, Clone, Copy)]
pub struct RunPoller {
    interval: Duration,
    deadline: Option<Duration>,
}

impl Default for RunPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl RunPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    #[tracing::instrument(
        name = "pipeline_stage poll",
        skip(self, api, observer, job),
        fields(
            pipeline.stage = "poll",
            run.id = %job.run_id,
            run.poll_attempts,
            run.final_status,
        )
    )]
    pub async fn wait(
        &self,
        api: &dyn AssistantApi,
        observer: &dyn ReportObserver,
        mut job: RunJob,
    ) -> Result<RunJob, ReportError> {
        let span = tracing::Span::current();
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let status = api
                .get_run_status(&job.thread_id, &job.run_id)
                .await
                .map_err(|source| ReportError::RunStatus {
                    run_id: job.run_id.clone(),
                    source,
                })?;

            job.status = status;
            observer.run_polled(&job.run_id, status, attempt);

            if status.is_terminal() {
                span.record("run.poll_attempts", attempt);
                span.record("run.final_status", status.as_str());

                return match status {
                    RunStatus::Completed => Ok(job),
                    _ => Err(ReportError::RunFailed {
                        run_id: job.run_id,
                        status,
                    }),
                };
            }

            if let Some(deadline) = self.deadline {
                let waited = started.elapsed();
                if waited >= deadline {
                    span.record("run.poll_attempts", attempt);
                    return Err(ReportError::PollDeadline {
                        run_id: job.run_id,
                        status,
                        waited,
                    });
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
