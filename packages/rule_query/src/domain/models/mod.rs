pub mod chat;
pub mod config;
pub mod session;
pub mod solution;

pub use chat::{ChatMessage, ChatRole, CompletionRequest, ModelFamily};
pub use config::{EngineConfig, LlmConfig, SessionConfig};
pub use session::{CaseReport, SessionState, TestCase};
pub use solution::{Binding, QueryOutcome, Solution, Verdict};
