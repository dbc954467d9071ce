//! Downstream half of the pipeline: format extracted sections into a prompt
//! and run it through a generative-text service.

use thiserror::Error;

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use prompt::build_prompt;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM API returned status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The service refused the prompt (safety feedback) without a candidate.
    #[error("prompt was blocked by the LLM service: {0}")]
    Blocked(String),
    #[error("LLM response contained no text")]
    EmptyResponse,
}
