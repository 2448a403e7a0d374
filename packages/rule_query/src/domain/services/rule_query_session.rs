//! Rule/query session - sequences the LLM and the logic engine.
//!
//! One session owns one scratch file and one engine. Rules are compiled and
//! consulted once; afterwards any number of natural-language questions can be
//! translated, executed and optionally narrated against the same program.
//!
//! # Lifecycle
//! `Created -> RulesLoaded -> Querying* -> CleanedUp`. Operations outside
//! their state fail with a lifecycle error, and `clean_up` is not idempotent:
//! a second call reports `SessionClosed`. Dropping a session removes its
//! scratch file even when `clean_up` was never called.

use crate::domain::errors::{LlmError, OrchestratorError, OrchestratorResult};
use crate::domain::models::{CaseReport, CompletionRequest, QueryOutcome, SessionConfig, SessionState, TestCase};
use crate::domain::services::llm_client::LlmClient;
use crate::domain::services::logic_engine::LogicEngine;
use crate::domain::services::prompts;
use crate::domain::services::query_gate::validate_query;
use crate::domain::services::scratch_file::ScratchFile;
use crate::domain::services::text_cleanup::strip_code_fences;
use std::path::Path;

pub struct RuleQuerySession<L: LlmClient, E: LogicEngine> {
    llm: L,
    engine: E,
    config: SessionConfig,
    model: String,
    scratch: Option<ScratchFile>,
    program: Option<String>,
    state: SessionState,
}

impl<L: LlmClient, E: LogicEngine> RuleQuerySession<L, E> {
    /// Creates a session and reserves its scratch file in `config.scratch_dir`.
    pub fn new(llm: L, engine: E, config: SessionConfig) -> OrchestratorResult<Self> {
        let scratch = ScratchFile::allocate(&config.scratch_dir, &config.scratch_extension)
            .map_err(|source| OrchestratorError::ScratchFile {
                path: config.scratch_dir.display().to_string(),
                source,
            })?;
        let model = llm.default_model().to_string();
        tracing::info!(scratch = %scratch.path().display(), model = %model, "session created");

        Ok(Self {
            llm,
            engine,
            config,
            model,
            scratch: Some(scratch),
            program: None,
            state: SessionState::Created,
        })
    }

    /// Overrides the model used for every LLM call of this session.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn scratch_path(&self) -> Option<&Path> {
        self.scratch.as_ref().map(ScratchFile::path)
    }

    /// Program source currently consulted by the engine
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn narrates(&self) -> bool {
        self.config.narrate
    }

    /// Asks the model to translate `rules_text` into Prolog and returns the
    /// fence-stripped source. Nothing is written or consulted.
    pub async fn compile_rules(&self, rules_text: &str) -> OrchestratorResult<String> {
        self.ensure_open()?;
        let program = strip_code_fences(&self.complete(prompts::rules_to_program(rules_text)).await?);
        if program.is_empty() {
            return Err(self.llm_error(LlmError::EmptyResponse));
        }
        Ok(program)
    }

    /// Compiles the rules, writes them to the scratch file and consults it.
    pub async fn load_rules(&mut self, rules_text: &str) -> OrchestratorResult<()> {
        match self.state {
            SessionState::Created => {}
            SessionState::CleanedUp => return Err(OrchestratorError::SessionClosed),
            _ => return Err(OrchestratorError::RulesAlreadyLoaded),
        }

        tracing::info!("generating Prolog program from rules");
        let program = self.compile_rules(rules_text).await?;

        let scratch = self.scratch.as_ref().ok_or(OrchestratorError::SessionClosed)?;
        scratch
            .write(&program)
            .await
            .map_err(|source| scratch_error(scratch.path(), source))?;

        tracing::info!(path = %scratch.path().display(), "consulting generated program");
        self.engine.consult(scratch.path()).await.map_err(|e| {
            tracing::error!(error = %e, "consult failed");
            OrchestratorError::from(e)
        })?;

        self.program = Some(program);
        self.state = SessionState::RulesLoaded;
        Ok(())
    }

    /// Turns an English test-case description into a single goal, using the
    /// consulted program (read back from the scratch file) as context.
    pub async fn translate_query(&mut self, question: &str) -> OrchestratorResult<String> {
        self.ensure_queryable()?;
        let scratch = self.scratch.as_ref().ok_or(OrchestratorError::SessionClosed)?;
        let program = scratch.read().await.map_err(|source| {
            tracing::error!(path = %scratch.path().display(), error = %source, "failed to read program file");
            scratch_error(scratch.path(), source)
        })?;

        let query = strip_code_fences(&self.complete(prompts::question_to_query(&program, question)).await?);
        self.state = SessionState::Querying;
        Ok(query)
    }

    /// Runs `query_text` against the consulted program.
    ///
    /// The query must pass the local gate first. A goal without solutions is
    /// `QueryOutcome::NoSolution`; an engine exception is an error.
    pub async fn query(&mut self, query_text: &str) -> OrchestratorResult<QueryOutcome> {
        self.ensure_queryable()?;
        let checked = validate_query(query_text)?;
        if checked.variables.is_empty() {
            tracing::warn!(query = %checked.text, "query binds no variables; only success or failure will be visible");
        }

        tracing::info!(query = %checked.text, "executing query");
        self.state = SessionState::Querying;
        let solutions = self.engine.query(&checked.text).await.map_err(|e| {
            tracing::error!(error = %e, "query execution failed");
            OrchestratorError::from(e)
        })?;
        Ok(QueryOutcome::from_solutions(solutions))
    }

    /// Phrases the raw outcome as a plain-language answer to `question`.
    pub async fn narrate(
        &mut self,
        question: &str,
        query_text: &str,
        outcome: &QueryOutcome,
    ) -> OrchestratorResult<String> {
        self.ensure_queryable()?;
        let answer = self
            .complete(prompts::narrate_answer(question, query_text, &outcome.to_string()))
            .await?;
        Ok(answer.trim().to_string())
    }

    /// Translate, execute and (when configured) narrate one test case.
    ///
    /// Failures that only concern this case are recorded in the report;
    /// errors that leave the session unusable are returned.
    pub async fn run_case(&mut self, case: &TestCase) -> OrchestratorResult<CaseReport> {
        let mut report = CaseReport::new(case);
        match self.run_case_steps(case, &mut report).await {
            Ok(()) => Ok(report),
            Err(e) if !e.is_fatal() => {
                tracing::warn!(case = %case.title, error = %e, "test case failed");
                report.error = Some(e.to_string());
                Ok(report)
            }
            Err(e) => Err(e),
        }
    }

    async fn run_case_steps(&mut self, case: &TestCase, report: &mut CaseReport) -> OrchestratorResult<()> {
        let query = self.translate_query(&case.question).await?;
        report.query = Some(query.clone());

        let outcome = self.query(&query).await?;
        report.set_outcome(outcome.clone());

        if self.config.narrate {
            report.narration = Some(self.narrate(&case.question, &query, &outcome).await?);
        }
        Ok(())
    }

    /// Removes the scratch file and closes the session.
    pub async fn clean_up(&mut self) -> OrchestratorResult<()> {
        self.ensure_open()?;
        self.state = SessionState::CleanedUp;
        self.program = None;

        let scratch = self.scratch.take().ok_or(OrchestratorError::SessionClosed)?;
        let path = scratch.path().to_path_buf();
        scratch.remove().map_err(|source| scratch_error(&path, source))?;
        tracing::info!(path = %path.display(), "session cleaned up");
        Ok(())
    }

    async fn complete(&self, prompt: String) -> OrchestratorResult<String> {
        tracing::debug!(model = %self.model, prompt = %prompt, "LLM prompt");
        let reply = self
            .llm
            .complete(CompletionRequest::from_prompt(self.model.clone(), prompt))
            .await
            .map_err(|e| self.llm_error(e))?;
        tracing::debug!(reply = %reply, "LLM reply");
        Ok(reply)
    }

    fn llm_error(&self, source: LlmError) -> OrchestratorError {
        OrchestratorError::LlmCall {
            model: self.model.clone(),
            source,
        }
    }

    fn ensure_open(&self) -> OrchestratorResult<()> {
        if self.state == SessionState::CleanedUp {
            Err(OrchestratorError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn ensure_queryable(&self) -> OrchestratorResult<()> {
        self.ensure_open()?;
        if self.state.accepts_queries() {
            Ok(())
        } else {
            Err(OrchestratorError::RulesNotLoaded)
        }
    }
}

fn scratch_error(path: &Path, source: std::io::Error) -> OrchestratorError {
    OrchestratorError::ScratchFile {
        path: path.display().to_string(),
        source,
    }
}
