use std::time::Duration;

use thiserror::Error;

use crate::assistant::{RunId, RunStatus, ThreadId};

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Session,
    Upload,
    Submit,
    Poll,
    Collect,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Session => "session",
            Stage::Upload => "upload",
            Stage::Submit => "submit",
            Stage::Poll => "poll",
            Stage::Collect => "collect",
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Image {index} is not valid base64: {source}")]
    Decode {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Error uploading image {index}: {source}")]
    FileUpload {
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error uploading one or more images ({failed} of {total} failed): {first}")]
    Upload {
        failed: usize,
        total: usize,
        #[source]
        first: Box<ReportError>,
    },

    #[error("Error creating assistant thread: {0}")]
    SessionCreation(#[source] anyhow::Error),

    #[error("Error adding message to thread {thread_id}: {source}")]
    MessageAppend {
        thread_id: ThreadId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error creating run on thread {thread_id}: {source}")]
    RunCreation {
        thread_id: ThreadId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error checking run status for run {run_id}: {source}")]
    RunStatus {
        run_id: RunId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Run {run_id} failed with status: {status}")]
    RunFailed { run_id: RunId, status: RunStatus },

    #[error("Run {run_id} still {status} after {waited:?}")]
    PollDeadline {
        run_id: RunId,
        status: RunStatus,
        waited: Duration,
    },

    #[error("Error listing messages for thread {thread_id}: {source}")]
    ResultFetch {
        thread_id: ThreadId,
        #[source]
        source: anyhow::Error,
    },
}

impl ReportError {
    pub fn stage(&self) -> Stage {
        match self {
            ReportError::Decode { .. }
            | ReportError::FileUpload { .. }
            | ReportError::Upload { .. } => Stage::Upload,
            ReportError::SessionCreation(_) => Stage::Session,
            ReportError::MessageAppend { .. } | ReportError::RunCreation { .. } => Stage::Submit,
            ReportError::RunStatus { .. }
            | ReportError::RunFailed { .. }
            | ReportError::PollDeadline { .. } => Stage::Poll,
            ReportError::ResultFetch { .. } => Stage::Collect,
        }
    }

    /// Short machine-readable label, used as the `error.type` span/metric attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Decode { .. } => "decode_error",
            ReportError::FileUpload { .. } => "file_upload_error",
            ReportError::Upload { .. } => "upload_error",
            ReportError::SessionCreation(_) => "session_creation_error",
            ReportError::MessageAppend { .. } => "message_append_error",
            ReportError::RunCreation { .. } => "run_creation_error",
            ReportError::RunStatus { .. } => "run_status_error",
            ReportError::RunFailed { .. } => "run_failed_error",
            ReportError::PollDeadline { .. } => "poll_deadline_error",
            ReportError::ResultFetch { .. } => "result_fetch_error",
        }
    }
}
