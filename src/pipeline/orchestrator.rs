use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::assistant::{AssistantApi, MessagePage};

use super::collect::collect_messages;
use super::content::assemble_content;
use super::error::{ReportError, Stage};
use super::observer::{ReportObserver, TracingObserver};
use super::poll::RunPoller;
use super::run::submit_run;
use super::session::create_session;
use super::upload::upload_images;

/// Drives one report from thread creation to the final message listing.
///
/// Holds no per-request state, so a single instance serves concurrent
/// requests; each call gets its own thread and run.
pub struct ReportOrchestrator {
    api: Arc<dyn AssistantApi>,
    assistant_id: String,
    poller: RunPoller,
    observer: Arc<dyn ReportObserver>,
}

impl ReportOrchestrator {
    pub fn new(api: Arc<dyn AssistantApi>, assistant_id: impl Into<String>) -> Self {
        Self {
            api,
            assistant_id: assistant_id.into(),
            poller: RunPoller::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_poller(mut self, poller: RunPoller) -> Self {
        self.poller = poller;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ReportObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.api.name()
    }

    #[tracing::instrument(
        name = "pipeline report",
        skip(self, content, images),
        fields(
            report.assistant_id = %self.assistant_id,
            report.images_count = images.len(),
            report.duration_ms,
            otel.status_code,
            error.kind,
        )
    )]
    pub async fn generate_report(
        &self,
        content: &str,
        images: &[String],
    ) -> Result<MessagePage, ReportError> {
        let start = Instant::now();

        tracing::info!(images = images.len(), "Generating report");
        let result = self.run_stages(content, images).await;

        let elapsed = start.elapsed();
        let span = tracing::Span::current();
        span.record("report.duration_ms", elapsed.as_millis() as u64);
        match &result {
            Ok(_) => span.record("otel.status_code", "OK"),
            Err(e) => {
                span.record("error.kind", e.kind());
                span.record("otel.status_code", "ERROR")
            }
        };

        self.observer
            .report_finished(elapsed, result.as_ref().map(|_| ()));

        result
    }

    async fn run_stages(
        &self,
        content: &str,
        images: &[String],
    ) -> Result<MessagePage, ReportError> {
        let api = self.api.as_ref();
        let observer = self.observer.as_ref();

        // Stage 1: one fresh thread per request
        let thread_id = self
            .stage(Stage::Session, create_session(api, observer))
            .await?;

        // Stage 2: fan out uploads, join before assembly
        let uploaded = self
            .stage(Stage::Upload, upload_images(api, observer, images))
            .await?;

        let blocks = assemble_content(&uploaded, content);

        // Stage 3: append message and start the run
        let job = self
            .stage(
                Stage::Submit,
                submit_run(api, &thread_id, &self.assistant_id, &blocks),
            )
            .await?;

        // Stage 4: wait for a terminal status
        let job = self
            .stage(Stage::Poll, self.poller.wait(api, observer, job))
            .await?;

        // Stage 5: fetch the assistant's reply
        self.stage(Stage::Collect, collect_messages(api, &job.thread_id))
            .await
    }

    async fn stage<T>(
        &self,
        stage: Stage,
        fut: impl Future<Output = Result<T, ReportError>>,
    ) -> Result<T, ReportError> {
        self.observer.stage_started(stage);
        let started = Instant::now();

        match fut.await {
            Ok(value) => {
                self.observer.stage_finished(stage, started.elapsed());
                Ok(value)
            }
            Err(e) => {
                self.observer.stage_failed(stage, &e);
                Err(e)
            }
        }
    }
}
