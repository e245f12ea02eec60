//! In-memory assistant and observer used by the pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{ReportError, Stage};
use super::observer::ReportObserver;
use crate::assistant::{
    AssistantApi, ContentBlock, FileId, ImageAsset, MessagePage, RunId, RunJob, RunStatus,
    ThreadId,
};

pub fn encode(payload: &str) -> String {
    STANDARD.encode(payload.as_bytes())
}

#[derive(Default)]
pub struct ScriptedAssistant {
    pub fail_thread: bool,
    pub fail_payloads: Vec<String>,
    pub upload_delay: Option<Duration>,
    pub fail_append: bool,
    pub fail_run: bool,
    pub fail_list: bool,
    pub initial_status: Option<RunStatus>,
    pub statuses: Mutex<VecDeque<Result<RunStatus, String>>>,
    pub appended: Mutex<Vec<Vec<ContentBlock>>>,
    pub threads_created: AtomicUsize,
    pub uploads: AtomicUsize,
    pub appends: AtomicUsize,
    pub runs_started: AtomicUsize,
    pub status_queries: AtomicUsize,
    pub lists: AtomicUsize,
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, statuses: Vec<Result<RunStatus, &str>>) -> Self {
        *self.statuses.lock().unwrap() = statuses
            .into_iter()
            .map(|s| s.map_err(str::to_string))
            .collect();
        self
    }

    pub fn failing_upload(mut self, payload: &str) -> Self {
        self.fail_payloads.push(payload.to_string());
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AssistantApi for ScriptedAssistant {
    async fn create_thread(&self) -> anyhow::Result<ThreadId> {
        let n = self.threads_created.fetch_add(1, Ordering::SeqCst);
        if self.fail_thread {
            anyhow::bail!("thread service unavailable");
        }
        Ok(ThreadId(format!("thread_{n}")))
    }

    async fn upload_file(&self, asset: &ImageAsset, purpose: &str) -> anyhow::Result<FileId> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        assert_eq!(purpose, "vision");
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        let payload = String::from_utf8_lossy(&asset.bytes).to_string();
        if self.fail_payloads.contains(&payload) {
            anyhow::bail!("upload rejected for {payload}");
        }
        Ok(FileId(format!("file_{payload}")))
    }

    async fn append_message(
        &self,
        _thread_id: &ThreadId,
        content: &[ContentBlock],
    ) -> anyhow::Result<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_append {
            anyhow::bail!("message rejected");
        }
        self.appended.lock().unwrap().push(content.to_vec());
        Ok(())
    }

    async fn start_run(&self, thread_id: &ThreadId, assistant_id: &str) -> anyhow::Result<RunJob> {
        self.runs_started.fetch_add(1, Ordering::SeqCst);
        if self.fail_run {
            anyhow::bail!("assistant not found");
        }
        Ok(RunJob {
            thread_id: thread_id.clone(),
            assistant_id: assistant_id.to_string(),
            run_id: RunId::from("run_1"),
            status: self.initial_status.unwrap_or(RunStatus::Queued),
        })
    }

    async fn get_run_status(
        &self,
        _thread_id: &ThreadId,
        _run_id: &RunId,
    ) -> anyhow::Result<RunStatus> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(msg)) => Err(anyhow::anyhow!(msg)),
            None => Err(anyhow::anyhow!("status script exhausted")),
        }
    }

    async fn list_messages(&self, _thread_id: &ThreadId) -> anyhow::Result<MessagePage> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            anyhow::bail!("listing failed");
        }
        Ok(MessagePage {
            object: Some("list".to_string()),
            data: vec![serde_json::json!({"id": "msg_1", "role": "assistant"})],
            first_id: Some("msg_1".to_string()),
            last_id: Some("msg_1".to_string()),
            has_more: false,
            extra: serde_json::Map::new(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ReportObserver for RecordingObserver {
    fn stage_started(&self, stage: Stage) {
        self.push(format!("start:{}", stage.as_str()));
    }

    fn stage_failed(&self, stage: Stage, _error: &ReportError) {
        self.push(format!("failed:{}", stage.as_str()));
    }

    fn image_uploaded(&self, index: usize, _file_id: &FileId) {
        self.push(format!("uploaded:{index}"));
    }

    fn image_failed(&self, index: usize, _error: &ReportError) {
        self.push(format!("image_failed:{index}"));
    }

    fn run_polled(&self, _run_id: &RunId, status: RunStatus, attempt: u32) {
        self.push(format!("poll:{attempt}:{status}"));
    }
}
