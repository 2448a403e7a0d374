pub mod engine_error;
pub mod llm_error;
pub mod orchestrator_error;

pub use engine_error::{EngineError, EngineResult};
pub use llm_error::{LlmError, LlmResult};
pub use orchestrator_error::{OrchestratorError, OrchestratorResult};
