pub mod llm_client;
pub mod logic_engine;
pub mod prompts;
pub mod query_gate;
pub mod rule_query_session;
pub mod scratch_file;
pub mod swipl_engine;
pub mod text_cleanup;

pub use llm_client::{LlmClient, OpenAiClient, ScriptedLlmClient};
pub use logic_engine::{LogicEngine, ScriptedEngine};
pub use rule_query_session::RuleQuerySession;
pub use scratch_file::ScratchFile;
pub use swipl_engine::SwiplEngine;
pub use text_cleanup::strip_code_fences;
