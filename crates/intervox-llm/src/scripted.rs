//! Canned response streams for tests and the offline demo.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::mpsc;

use crate::error::LlmError;
use crate::stream::{ResponseStream, StreamEvent};

/// Replays canned responses, one per `generate` call, streamed line by line.
///
/// An `Err` entry produces a stream that fails after opening; an exhausted
/// queue fails the `generate` call itself.
pub struct ScriptedResponses {
    queue: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedResponses {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            queue: Mutex::new(responses.into()),
        }
    }

    pub fn from_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }
}

#[async_trait]
impl ResponseStream for ScriptedResponses {
    async fn generate(&self, _prompt: &str) -> Result<mpsc::Receiver<StreamEvent>, LlmError> {
        let next = self.queue.lock().pop_front().ok_or_else(|| {
            LlmError::Configuration("no scripted response left".to_string())
        })?;

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(async move {
            match next {
                Ok(text) => {
                    for line in text.lines() {
                        let mut chunk = line.to_string();
                        chunk.push('\n');
                        if tx.send(StreamEvent::Chunk(chunk)).await.is_err() {
                            return;
                        }
                    }
                    let _ = tx.send(StreamEvent::Done).await;
                }
                Err(message) => {
                    let _ = tx.send(StreamEvent::Failed(message)).await;
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::collect_stream;

    #[tokio::test]
    async fn replays_responses_in_order() {
        let scripted = ScriptedResponses::from_texts(&["first\nresponse", "second"]);
        let rx = scripted.generate("p1").await.unwrap();
        assert_eq!(collect_stream(rx).await.unwrap(), "first\nresponse\n");
        let rx = scripted.generate("p2").await.unwrap();
        assert_eq!(collect_stream(rx).await.unwrap(), "second\n");
    }

    #[tokio::test]
    async fn scripted_failure_surfaces_as_stream_error() {
        let scripted = ScriptedResponses::new(vec![Err("rate limited".to_string())]);
        let rx = scripted.generate("p").await.unwrap();
        assert!(matches!(
            collect_stream(rx).await,
            Err(LlmError::Stream(msg)) if msg == "rate limited"
        ));
    }

    #[tokio::test]
    async fn exhausted_queue_fails_generate() {
        let scripted = ScriptedResponses::from_texts(&[]);
        assert!(scripted.generate("p").await.is_err());
    }
}
