use thiserror::Error;

/// Error types for the Prolog engine seam
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A query was issued before any program was consulted
    #[error("No program has been consulted")]
    NotConsulted,

    /// The engine reported errors while loading the program
    #[error("Failed to consult '{path}': {message}")]
    ConsultFailed { path: String, message: String },

    /// The goal raised an exception (syntax error, unknown procedure, ...)
    #[error("Query raised an exception: {0}")]
    QueryFailed(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The engine executable could not be started
    #[error("Prolog engine unavailable: {0}")]
    Unavailable(String),

    /// The engine produced output that could not be decoded
    #[error("Unreadable engine output: {0}")]
    InvalidOutput(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
