//! Logic-engine seam: consult a program file, then run goals against it.

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::Solution;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[async_trait]
pub trait LogicEngine: Send + Sync {
    /// Loads the program at `path`, replacing whatever was consulted before.
    async fn consult(&mut self, path: &Path) -> EngineResult<()>;

    /// Runs `goal` (no `?-`, no terminator) and collects every solution.
    ///
    /// A goal that simply fails yields an empty vector; exceptions raised by
    /// the goal are errors.
    async fn query(&self, goal: &str) -> EngineResult<Vec<Solution>>;
}

/// Engine stand-in with canned answers.
///
/// `consult` captures the text of the consulted file so tests can compare it
/// with what the LLM produced.
#[derive(Default)]
pub struct ScriptedEngine {
    consult_error: Option<EngineError>,
    consulted: Vec<(PathBuf, String)>,
    answers: Mutex<VecDeque<EngineResult<Vec<Solution>>>>,
    goals: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new(answers: Vec<EngineResult<Vec<Solution>>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn failing_consult(error: EngineError) -> Self {
        Self {
            consult_error: Some(error),
            ..Self::default()
        }
    }

    /// Every `(path, contents)` pair seen by `consult`, oldest first.
    pub fn consulted(&self) -> &[(PathBuf, String)] {
        &self.consulted
    }

    pub fn goals(&self) -> Vec<String> {
        self.goals.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LogicEngine for ScriptedEngine {
    async fn consult(&mut self, path: &Path) -> EngineResult<()> {
        if let Some(error) = &self.consult_error {
            return Err(error.clone());
        }
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EngineError::ConsultFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        self.consulted.push((path.to_path_buf(), contents));
        Ok(())
    }

    async fn query(&self, goal: &str) -> EngineResult<Vec<Solution>> {
        if self.consulted.is_empty() {
            return Err(EngineError::NotConsulted);
        }
        self.goals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(goal.to_string());
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
