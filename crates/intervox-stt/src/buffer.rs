//! Per-turn transcript accumulation.

/// Mutable hypothesis buffer tied to one listening turn.
///
/// Recognition callbacks deliver the best current full-utterance hypothesis,
/// so updates are last-write-wins. The buffer is cleared on submit or cancel
/// and never shared across turns.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    text: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffered hypothesis with the latest one.
    pub fn update(&mut self, hypothesis: &str) {
        self.text.clear();
        self.text.push_str(hypothesis);
    }

    /// Current hypothesis, untrimmed.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take the trimmed transcript, clearing the buffer.
    ///
    /// Returns `None` and leaves the buffer untouched when the trimmed text
    /// is empty, so a spurious submit cannot consume a turn.
    pub fn take_trimmed(&mut self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let out = trimmed.to_string();
        self.text.clear();
        Some(out)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_are_last_write_wins() {
        let mut buf = TranscriptBuffer::new();
        buf.update("I worked");
        buf.update("I worked on a");
        buf.update("I worked on a distributed cache");
        assert_eq!(buf.as_str(), "I worked on a distributed cache");
    }

    #[test]
    fn take_trimmed_strips_whitespace_and_clears() {
        let mut buf = TranscriptBuffer::new();
        buf.update("  an answer  ");
        assert_eq!(buf.take_trimmed().as_deref(), Some("an answer"));
        assert!(buf.is_blank());
    }

    #[test]
    fn blank_take_is_none_and_nondestructive() {
        let mut buf = TranscriptBuffer::new();
        buf.update("   \t  ");
        assert_eq!(buf.take_trimmed(), None);
        // The (blank) content is still there; a later hypothesis overwrites it.
        buf.update("real answer");
        assert_eq!(buf.take_trimmed().as_deref(), Some("real answer"));
    }

    #[test]
    fn clear_discards_everything() {
        let mut buf = TranscriptBuffer::new();
        buf.update("something");
        buf.clear();
        assert!(buf.is_blank());
        assert_eq!(buf.take_trimmed(), None);
    }
}
