use crate::assistant::{AssistantApi, MessagePage, ThreadId};

use super::error::ReportError;

#[tracing::instrument(
    name = "pipeline_stage collect",
    skip(api),
    fields(pipeline.stage = "collect", messages.count)
)]
pub async fn collect_messages(
    api: &dyn AssistantApi,
    thread_id: &ThreadId,
) -> Result<MessagePage, ReportError> {
    let messages = api
        .list_messages(thread_id)
        .await
        .map_err(|source| ReportError::ResultFetch {
            thread_id: thread_id.clone(),
            source,
        })?;

    tracing::Span::current().record("messages.count", messages.data.len());

    Ok(messages)
}
