//! The response-stream capability interface.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::LlmError;

/// One element of an incremental model response.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A fragment of response text, in arrival order.
    Chunk(String),
    /// The response completed; no further events follow.
    Done,
    /// The stream failed; no further events follow.
    Failed(String),
}

/// A prompt-in, text-stream-out capability.
///
/// `generate` resolves once the stream is established; chunks then arrive on
/// the returned channel, terminated by exactly one `Done` or `Failed`.
#[async_trait]
pub trait ResponseStream: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<mpsc::Receiver<StreamEvent>, LlmError>;
}

/// Accumulate a stream into its full text.
///
/// Never yields a partial buffer: a `Failed` event or a channel that closes
/// before `Done` is an error.
pub async fn collect_stream(mut rx: mpsc::Receiver<StreamEvent>) -> Result<String, LlmError> {
    let mut buffer = String::new();
    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Chunk(chunk) => buffer.push_str(&chunk),
            StreamEvent::Done => return Ok(buffer),
            StreamEvent::Failed(message) => return Err(LlmError::Stream(message)),
        }
    }
    Err(LlmError::Stream(
        "response stream ended without completion".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_joins_chunks_in_order() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Chunk("Behavioral: ".into())).await.unwrap();
        tx.send(StreamEvent::Chunk("Tell me about a conflict.".into()))
            .await
            .unwrap();
        tx.send(StreamEvent::Done).await.unwrap();
        assert_eq!(
            collect_stream(rx).await.unwrap(),
            "Behavioral: Tell me about a conflict."
        );
    }

    #[tokio::test]
    async fn failed_stream_discards_partial_text() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Chunk("OVERALL".into())).await.unwrap();
        tx.send(StreamEvent::Failed("connection reset".into()))
            .await
            .unwrap();
        assert!(matches!(
            collect_stream(rx).await,
            Err(LlmError::Stream(msg)) if msg.contains("connection reset")
        ));
    }

    #[tokio::test]
    async fn dropped_sender_is_an_error() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Chunk("half a ".into())).await.unwrap();
        drop(tx);
        assert!(collect_stream(rx).await.is_err());
    }
}
