use crate::domain::errors::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_MODEL: &str = "o3-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the chat-completion API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 300,
        }
    }
}

impl LlmConfig {
    pub fn validate(&self) -> LlmResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }
        self.completions_url().map(|_| ())
    }

    /// `{base_url}/chat/completions`, tolerant of a missing trailing slash.
    pub fn completions_url(&self) -> LlmResult<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join("chat/completions"))
            .map_err(|e| LlmError::InvalidEndpoint(format!("{}: {}", self.base_url, e)))
    }
}

/// How the `swipl` executable is driven
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub swipl_path: PathBuf,
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            swipl_path: PathBuf::from("swipl"),
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory that receives the scratch program file
    pub scratch_dir: PathBuf,
    pub scratch_extension: String,
    /// Ask the LLM to phrase each result in plain language
    pub narrate: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("."),
            scratch_extension: "pl".to_string(),
            narrate: false,
        }
    }
}
