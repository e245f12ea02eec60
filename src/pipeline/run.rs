use crate::assistant::{AssistantApi, ContentBlock, RunJob, ThreadId};

use super::error::ReportError;

/// Appends `content` as a user message, then starts the assistant on the
/// thread. A message that was appended stays on the thread if the run cannot
/// be started.
#[tracing::instrument(
    name = "pipeline_stage submit",
    skip(api, content),
    fields(
        pipeline.stage = "submit",
        content.blocks = content.len(),
        run.id,
        run.status,
    )
)]
pub async fn submit_run(
    api: &dyn AssistantApi,
    thread_id: &ThreadId,
    assistant_id: &str,
    content: &[ContentBlock],
) -> Result<RunJob, ReportError> {
    api.append_message(thread_id, content)
        .await
        .map_err(|source| ReportError::MessageAppend {
            thread_id: thread_id.clone(),
            source,
        })?;
    tracing::info!(thread.id = %thread_id, "Message added to thread");

    let job = api
        .start_run(thread_id, assistant_id)
        .await
        .map_err(|source| ReportError::RunCreation {
            thread_id: thread_id.clone(),
            source,
        })?;

    let span = tracing::Span::current();
    span.record("run.id", job.run_id.as_str());
    span.record("run.status", job.status.as_str());
    tracing::info!(run.id = %job.run_id, "Run created successfully");

    Ok(job)
}
