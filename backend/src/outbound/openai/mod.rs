//! Completion model outbound adapter.
//!
//! Thin reqwest implementation of the `CompletionModel` port over an
//! OpenAI-compatible chat-completions API.

mod dto;
mod http_model;

pub use http_model::{ApiKey, OpenAiHttpModel};
