//! OpenAI-compatible streaming chat client.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::LlmError;
use crate::stream::{ResponseStream, StreamEvent};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Streams `/chat/completions` responses over server-sent events.
///
/// Works against any OpenAI-compatible endpoint; the API key is optional for
/// keyless local gateways.
pub struct ChatStreamClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatStreamClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ResponseStream for ChatStreamClient {
    async fn generate(&self, prompt: &str) -> Result<mpsc::Receiver<StreamEvent>, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(target: "llm", "Requesting completion stream from {url} (model: {})", self.model);

        let mut builder = self.http.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?.error_for_status()?;

        let (tx, rx) = mpsc::channel(64);
        let mut body = response.bytes_stream();

        tokio::spawn(async move {
            let mut pending = String::new();
            while let Some(item) = body.next().await {
                let bytes = match item {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Failed(e.to_string())).await;
                        return;
                    }
                };
                pending.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(pos) = pending.find('\n') {
                    let line: String = pending.drain(..=pos).collect();
                    let Some(data) = line.trim().strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        let _ = tx.send(StreamEvent::Done).await;
                        return;
                    }
                    match serde_json::from_str::<ChatChunk>(data) {
                        Ok(chunk) => {
                            let content = chunk
                                .choices
                                .into_iter()
                                .next()
                                .and_then(|c| c.delta.content);
                            if let Some(content) = content {
                                if tx.send(StreamEvent::Chunk(content)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        // Keep-alives and other non-chunk frames are skipped.
                        Err(e) => trace!(target: "llm", "Skipping non-chunk frame: {e}"),
                    }
                }
            }
            let _ = tx
                .send(StreamEvent::Failed(
                    "stream ended without completion".to_string(),
                ))
                .await;
        });

        Ok(rx)
    }
}
