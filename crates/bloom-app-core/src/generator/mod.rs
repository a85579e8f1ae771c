//! External text generation.
//!
//! [`TextGenerator`] is the seam the quote cache calls on a miss.
//! [`OpenAiGenerator`] talks to any OpenAI-compatible `chat/completions`
//! endpoint.

mod openai;

pub use openai::{OpenAiConfig, OpenAiGenerator};

use std::future::Future;

use crate::error::GenerationError;

/// A fixed two-turn prompt: a system instruction and a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub system: &'static str,
    pub user: &'static str,
}

/// Prompt used for the quote of the day. No per-user personalisation.
pub const DAILY_QUOTE_PROMPT: PromptTemplate = PromptTemplate {
    system: "You are a romantic poet. Generate a short, beautiful, and romantic quote \
             or compliment for a birthday surprise website. Keep it under 20 words. \
             Do not use hashtags or emojis.",
    user: "Generate a romantic quote for today.",
};

/// Single request/response text generation. May fail or be slow; callers
/// bound it with their own timeout.
pub trait TextGenerator: Send + Sync + 'static {
    fn generate(
        &self,
        prompt: &PromptTemplate,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}
