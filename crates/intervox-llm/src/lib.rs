//! Streaming LLM collaborator for Intervox
//!
//! The session never calls a model directly; it depends on the
//! [`ResponseStream`] capability defined here. This crate also carries the
//! prompt builders and the pure parsers that turn semi-structured model text
//! into [`intervox_foundation::Question`] lists and
//! [`intervox_foundation::Analysis`] records.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod scripted;
pub mod stream;

pub use client::ChatStreamClient;
pub use error::LlmError;
pub use parse::{parse_analysis, parse_questions};
pub use scripted::ScriptedResponses;
pub use stream::{collect_stream, ResponseStream, StreamEvent};

/// Generates unique question IDs
static QUESTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique question ID
pub fn next_question_id() -> u64 {
    QUESTION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
