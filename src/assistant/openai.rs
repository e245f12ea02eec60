use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    AssistantApi, ContentBlock, FileId, ImageAsset, MessagePage, RunId, RunJob, RunStatus,
    ThreadId,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Assistants v2 over plain REST.
pub struct OpenAiAssistants {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiAssistants {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Deserialize)]
struct ObjectRef {
    id: String,
}

#[derive(Serialize)]
struct CreateMessageBody<'a> {
    role: &'static str,
    content: Vec<WireContent<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContent<'a> {
    ImageFile { image_file: WireImageFile<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct WireImageFile<'a> {
    file_id: &'a str,
}

impl<'a> From<&'a ContentBlock> for WireContent<'a> {
    fn from(block: &'a ContentBlock) -> Self {
        match block {
            ContentBlock::Image { file_id } => WireContent::ImageFile {
                image_file: WireImageFile {
                    file_id: file_id.as_str(),
                },
            },
            ContentBlock::Text { value } => WireContent::Text { text: value },
        }
    }
}

#[derive(Serialize)]
struct CreateRunBody<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct WireRun {
    id: String,
    thread_id: String,
    assistant_id: String,
    status: RunStatus,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> anyhow::Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        if let Ok(err) = serde_json::from_str::<OpenAiError>(&error_body) {
            return Err(anyhow::anyhow!(
                "OpenAI API error on {} ({}): {}",
                operation,
                status,
                err.error.message
            ));
        }
        return Err(anyhow::anyhow!(
            "OpenAI API error on {} ({}): {}",
            operation,
            status,
            error_body
        ));
    }

    Ok(response.json().await?)
}

#[async_trait::async_trait]
impl AssistantApi for OpenAiAssistants {
    async fn create_thread(&self) -> anyhow::Result<ThreadId> {
        let response = self
            .client
            .post(self.url("/threads"))
            .headers(self.headers()?)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let thread: ObjectRef = read_json(response, "create thread").await?;
        Ok(ThreadId(thread.id))
    }

    async fn upload_file(&self, asset: &ImageAsset, purpose: &str) -> anyhow::Result<FileId> {
        let part = Part::bytes(asset.bytes.clone())
            .file_name(asset.filename.clone())
            .mime_str(asset.mime_type)?;
        let form = Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.url("/files"))
            .headers(self.headers()?)
            .multipart(form)
            .send()
            .await?;

        let file: ObjectRef = read_json(response, "upload file").await?;
        Ok(FileId(file.id))
    }

    async fn append_message(
        &self,
        thread_id: &ThreadId,
        content: &[ContentBlock],
    ) -> anyhow::Result<()> {
        let body = CreateMessageBody {
            role: "user",
            content: content.iter().map(WireContent::from).collect(),
        };

        let response = self
            .client
            .post(self.url(&format!("/threads/{thread_id}/messages")))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let _: ObjectRef = read_json(response, "create message").await?;
        Ok(())
    }

    async fn start_run(&self, thread_id: &ThreadId, assistant_id: &str) -> anyhow::Result<RunJob> {
        let response = self
            .client
            .post(self.url(&format!("/threads/{thread_id}/runs")))
            .headers(self.headers()?)
            .json(&CreateRunBody { assistant_id })
            .send()
            .await?;

        let run: WireRun = read_json(response, "create run").await?;
        Ok(RunJob {
            thread_id: ThreadId(run.thread_id),
            assistant_id: run.assistant_id,
            run_id: RunId(run.id),
            status: run.status,
        })
    }

    async fn get_run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> anyhow::Result<RunStatus> {
        let response = self
            .client
            .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}")))
            .headers(self.headers()?)
            .send()
            .await?;

        let run: WireRun = read_json(response, "retrieve run").await?;
        Ok(run.status)
    }

    async fn list_messages(&self, thread_id: &ThreadId) -> anyhow::Result<MessagePage> {
        let response = self
            .client
            .get(self.url(&format!("/threads/{thread_id}/messages")))
            .headers(self.headers()?)
            .send()
            .await?;

        read_json(response, "list messages").await
    }

    fn name(&self) -> &str {
        "openai"
    }
}
