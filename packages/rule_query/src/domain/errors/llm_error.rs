use thiserror::Error;

/// Failures of the chat-completion collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("No API key configured (set OPENAI_API_KEY)")]
    MissingCredential,

    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {code} from completion API: {body}")]
    Status { code: u16, body: String },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("LLM returned empty response")]
    EmptyResponse,
}

pub type LlmResult<T> = Result<T, LlmError>;
