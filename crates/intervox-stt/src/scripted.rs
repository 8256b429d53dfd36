//! Deterministic speech input for tests and the offline demo.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::provider::{SpeechInput, SpeechInputError};
use crate::types::TranscriptEvent;
use crate::next_utterance_id;

/// Replays a scripted sequence of utterance hypotheses, one script per turn.
///
/// Each `start` pops the next script and emits its hypotheses as partials,
/// followed by a final carrying the last hypothesis. A turn with no script
/// left stays silent until stopped.
pub struct ScriptedSpeechInput {
    scripts: Mutex<VecDeque<Vec<String>>>,
    running: Mutex<Option<JoinHandle<()>>>,
    chunk_delay: Duration,
}

impl ScriptedSpeechInput {
    pub fn new(scripts: Vec<Vec<String>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            running: Mutex::new(None),
            chunk_delay: Duration::from_millis(5),
        }
    }

    /// One final hypothesis per turn, no partials.
    pub fn from_answers(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| vec![a.to_string()]).collect())
    }
}

#[async_trait]
impl SpeechInput for ScriptedSpeechInput {
    async fn start(&self) -> Result<mpsc::Receiver<TranscriptEvent>, SpeechInputError> {
        {
            let guard = self.running.lock();
            if guard.as_ref().is_some_and(|h| !h.is_finished()) {
                return Err(SpeechInputError::AlreadyActive);
            }
        }

        let script = self.scripts.lock().pop_front().unwrap_or_default();
        let (tx, rx) = mpsc::channel(32);
        let delay = self.chunk_delay;

        let handle = tokio::spawn(async move {
            let utterance_id = next_utterance_id();
            let mut last = None;
            for hypothesis in &script {
                tokio::time::sleep(delay).await;
                if tx
                    .send(TranscriptEvent::Partial {
                        utterance_id,
                        text: hypothesis.clone(),
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                last = Some(hypothesis.clone());
            }
            if let Some(text) = last {
                let _ = tx
                    .send(TranscriptEvent::Final { utterance_id, text })
                    .await;
            }
            // Keep the channel open (capture continues) until stop().
            std::future::pending::<()>().await;
        });

        *self.running.lock() = Some(handle);
        Ok(rx)
    }

    async fn stop(&self) -> Result<(), SpeechInputError> {
        if let Some(handle) = self.running.lock().take() {
            handle.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_hypotheses_then_finalizes() {
        let input = ScriptedSpeechInput::new(vec![vec![
            "I led".to_string(),
            "I led a migration".to_string(),
        ]]);
        let mut rx = input.start().await.unwrap();

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, TranscriptEvent::Partial { .. }));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.text(), Some("I led a migration"));
        let last = rx.recv().await.unwrap();
        assert!(matches!(last, TranscriptEvent::Final { .. }));
        assert_eq!(last.text(), Some("I led a migration"));

        input.stop().await.unwrap();
    }

    #[tokio::test]
    async fn each_turn_consumes_one_script() {
        let input = ScriptedSpeechInput::from_answers(&["first", "second"]);

        let mut rx = input.start().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().text(), Some("first"));
        input.stop().await.unwrap();

        let mut rx = input.start().await.unwrap();
        assert_eq!(rx.recv().await.unwrap().text(), Some("second"));
        input.stop().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_start_is_rejected() {
        let input = ScriptedSpeechInput::from_answers(&["only"]);
        let _rx = input.start().await.unwrap();
        assert!(matches!(
            input.start().await,
            Err(SpeechInputError::AlreadyActive)
        ));
        input.stop().await.unwrap();
        let _rx2 = input.start().await.unwrap();
    }
}
