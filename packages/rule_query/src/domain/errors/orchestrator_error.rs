use crate::domain::errors::{EngineError, LlmError};
use thiserror::Error;

/// Errors surfaced by a rule/query session.
///
/// Collaborator failures are never folded into ordinary output: an LLM failure
/// is not program text and an engine failure is not an empty solution set.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Error calling LLM model='{model}': {source}")]
    LlmCall {
        model: String,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Scratch file error on '{path}': {source}")]
    ScratchFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Rejected query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("Rules have not been loaded for this session")]
    RulesNotLoaded,

    #[error("Rules are already loaded; a session cannot reload them")]
    RulesAlreadyLoaded,

    #[error("Session has been cleaned up")]
    SessionClosed,
}

impl OrchestratorError {
    /// Whether the session cannot continue after this error.
    ///
    /// LLM failures, rejected queries and failing goals only affect the current
    /// test case; everything else leaves the session unusable.
    pub fn is_fatal(&self) -> bool {
        match self {
            OrchestratorError::LlmCall { .. } | OrchestratorError::InvalidQuery { .. } => false,
            OrchestratorError::Engine(e) => !matches!(
                e,
                EngineError::QueryFailed(_) | EngineError::Timeout(_) | EngineError::InvalidOutput(_)
            ),
            _ => true,
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
