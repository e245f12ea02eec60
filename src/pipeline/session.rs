use crate::assistant::{AssistantApi, ThreadId};

use super::error::ReportError;
use super::observer::ReportObserver;

/// Opens the single thread a report request runs on. The thread is never
/// closed here; each one is used for exactly one request.
#[tracing::instrument(
    name = "pipeline_stage session",
    skip(api, observer),
    fields(pipeline.stage = "session", thread.id)
)]
pub async fn create_session(
    api: &dyn AssistantApi,
    observer: &dyn ReportObserver,
) -> Result<ThreadId, ReportError> {
    let thread_id = api
        .create_thread()
        .await
        .map_err(ReportError::SessionCreation)?;

    tracing::Span::current().record("thread.id", thread_id.as_str());
    observer.thread_created(&thread_id);

    Ok(thread_id)
}
