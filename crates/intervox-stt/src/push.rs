//! Externally-fed speech input.
//!
//! Bridges any line-oriented text source (a terminal, a test harness) into
//! the [`SpeechInput`] capability: text pushed while a capture is active is
//! delivered as transcript events, text pushed while idle is dropped.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::provider::{SpeechInput, SpeechInputError};
use crate::types::TranscriptEvent;
use crate::next_utterance_id;

#[derive(Default)]
pub struct PushSpeechInput {
    active: Mutex<Option<mpsc::Sender<TranscriptEvent>>>,
}

impl PushSpeechInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an in-progress hypothesis for the current utterance.
    pub fn push_partial(&self, text: &str) {
        self.send(TranscriptEvent::Partial {
            utterance_id: next_utterance_id(),
            text: text.to_string(),
        });
    }

    /// Deliver a completed utterance.
    pub fn push(&self, text: &str) {
        self.send(TranscriptEvent::Final {
            utterance_id: next_utterance_id(),
            text: text.to_string(),
        });
    }

    fn send(&self, event: TranscriptEvent) {
        let mut guard = self.active.lock();
        match guard.as_ref() {
            Some(tx) => {
                if tx.try_send(event).is_err() {
                    // Receiver went away without a stop() call.
                    *guard = None;
                }
            }
            None => debug!(target: "stt", "Dropping pushed text: capture not active"),
        }
    }
}

#[async_trait]
impl SpeechInput for PushSpeechInput {
    async fn start(&self) -> Result<mpsc::Receiver<TranscriptEvent>, SpeechInputError> {
        let mut guard = self.active.lock();
        if guard.is_some() {
            return Err(SpeechInputError::AlreadyActive);
        }
        let (tx, rx) = mpsc::channel(32);
        *guard = Some(tx);
        Ok(rx)
    }

    async fn stop(&self) -> Result<(), SpeechInputError> {
        self.active.lock().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pushed_text_arrives_while_active() {
        let input = PushSpeechInput::new();
        let mut rx = input.start().await.unwrap();
        input.push_partial("my ans");
        input.push("my answer");
        assert_eq!(rx.recv().await.unwrap().text(), Some("my ans"));
        assert_eq!(rx.recv().await.unwrap().text(), Some("my answer"));
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let input = PushSpeechInput::new();
        let _rx = input.start().await.unwrap();
        assert!(matches!(
            input.start().await,
            Err(SpeechInputError::AlreadyActive)
        ));
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_closes_the_channel() {
        let input = PushSpeechInput::new();
        let mut rx = input.start().await.unwrap();
        input.stop().await.unwrap();
        input.stop().await.unwrap();
        assert!(rx.recv().await.is_none());
        // Pushes after stop are silently dropped.
        input.push("too late");
        // A fresh capture can start immediately afterwards.
        let _rx2 = input.start().await.unwrap();
    }
}
