pub mod openai;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use openai::OpenAiAssistants;

macro_rules! remote_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

remote_id!(ThreadId);
remote_id!(FileId);
remote_id!(RunId);

/// A decoded image ready to be sent to the remote file store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImageRef {
    pub file_id: FileId,
}

/// One unit of a user message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Image { file_id: FileId },
    Text { value: String },
}

impl ContentBlock {
    pub fn is_image(&self) -> bool {
        matches!(self, ContentBlock::Image { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentBlock::Text { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Incomplete
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle on a remote assistant run. Only the poller updates `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunJob {
    pub thread_id: ThreadId,
    pub assistant_id: String,
    pub run_id: RunId,
    pub status: RunStatus,
}

/// Message listing for a thread, passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[async_trait::async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_thread(&self) -> anyhow::Result<ThreadId>;

    async fn upload_file(&self, asset: &ImageAsset, purpose: &str) -> anyhow::Result<FileId>;

    async fn append_message(
        &self,
        thread_id: &ThreadId,
        content: &[ContentBlock],
    ) -> anyhow::Result<()>;

    async fn start_run(&self, thread_id: &ThreadId, assistant_id: &str) -> anyhow::Result<RunJob>;

    async fn get_run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> anyhow::Result<RunStatus>;

    async fn list_messages(&self, thread_id: &ThreadId) -> anyhow::Result<MessagePage>;

    fn name(&self) -> &str;
}
