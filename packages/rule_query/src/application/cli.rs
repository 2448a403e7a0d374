use crate::domain::models::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::domain::models::{EngineConfig, LlmConfig, SessionConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rule_query")]
#[command(about = "Compile business rules to Prolog with an LLM and check test cases against them", long_about = None)]
pub struct Cli {
    /// API key for the chat-completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model used for every completion
    #[arg(long, env = "RULE_QUERY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// HTTP timeout for one completion, in seconds
    #[arg(long, default_value_t = 300)]
    pub request_timeout_secs: u64,

    /// SWI-Prolog executable
    #[arg(long, env = "SWIPL_PATH", default_value = "swipl")]
    pub swipl: PathBuf,

    /// Timeout for one consult or query, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub query_timeout_ms: u64,

    /// Directory for the generated program file
    #[arg(long, default_value = ".")]
    pub scratch_dir: PathBuf,

    /// File with natural-language rules (default: built-in airline policy)
    #[arg(long)]
    pub rules_file: Option<PathBuf>,

    /// JSON array of {"title", "question"} objects (default: built-in cases)
    #[arg(long)]
    pub cases_file: Option<PathBuf>,

    /// Ask the model to phrase each result as a plain-language answer
    #[arg(long)]
    pub narrate: bool,

    /// Print one JSON report per case instead of the transcript
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            swipl_path: self.swipl.clone(),
            timeout_ms: self.query_timeout_ms,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            scratch_dir: self.scratch_dir.clone(),
            narrate: self.narrate,
            ..SessionConfig::default()
        }
    }
}
