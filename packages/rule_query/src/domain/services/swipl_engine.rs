//! SWI-Prolog engine driven through the `swipl` executable.
//!
//! `swipl` keeps its predicate database in process-global state, so instead of
//! holding one interpreter we remember the consulted file and start a fresh
//! process per operation. `consult` loads the file once with
//! `--on-error=status` to surface load errors; every `query` re-consults it and
//! prints one marked JSON line per solution.

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{Binding, EngineConfig, Solution};
use crate::domain::services::logic_engine::LogicEngine;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Prefix of every solution line written by [`QUERY_GOAL`]
pub const SOLUTION_MARKER: &str = "@@solution ";

/// Loads the file named by the last command-line argument.
const CONSULT_GOAL: &str = "current_prolog_flag(argv, Argv), last(Argv, File), consult(File)";

/// Loads the file, parses the query with its variable names, and prints every
/// solution as a JSON array of `[name, value]` pairs. Exceptions end the
/// process with status 2.
const QUERY_GOAL: &str = r#"catch(
    ( current_prolog_flag(argv, Argv),
      append(_, [File, Query], Argv),
      consult(File),
      use_module(library(http/json)),
      term_string(Goal, Query, [variable_names(Names)]),
      forall(call(Goal),
             ( findall([Name, Text],
                       ( member(Name = Value, Names),
                         \+ sub_atom(Name, 0, 1, _, '_'),
                         format(string(Text), "~w", [Value]) ),
                       Rows),
               format("@@solution "),
               json_write(current_output, Rows, [width(0)]),
               nl )),
      halt(0)
    ),
    Error,
    ( print_message(error, Error), halt(2) ))"#;

pub struct SwiplEngine {
    config: EngineConfig,
    program: Option<PathBuf>,
}

impl SwiplEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            program: None,
        }
    }

    /// Whether the configured executable starts at all.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.config.swipl_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    pub fn consulted(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    async fn run(&self, goal: &str, extra_flags: &[&str], args: &[&str]) -> EngineResult<Output> {
        let mut command = Command::new(&self.config.swipl_path);
        command
            .args(["-q", "-f", "none"])
            .args(extra_flags)
            .args(["-g", goal, "-t", "halt", "--"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout_ms = self.config.timeout_ms;
        match timeout(Duration::from_millis(timeout_ms), command.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Err(EngineError::Unavailable(format!(
                "'{}' not found; install SWI-Prolog (https://www.swi-prolog.org/download/stable) or set SWIPL_PATH",
                self.config.swipl_path.display()
            ))),
            Ok(Err(e)) => Err(EngineError::Unavailable(e.to_string())),
            Err(_) => Err(EngineError::Timeout(timeout_ms)),
        }
    }
}

#[async_trait]
impl LogicEngine for SwiplEngine {
    async fn consult(&mut self, path: &Path) -> EngineResult<()> {
        let file = path.to_string_lossy();
        let output = self.run(CONSULT_GOAL, &["--on-error=status"], &[file.as_ref()]).await?;

        if !output.status.success() {
            return Err(EngineError::ConsultFailed {
                path: file.to_string(),
                message: stderr_text(&output),
            });
        }
        tracing::debug!(path = %file, "program consulted");
        self.program = Some(path.to_path_buf());
        Ok(())
    }

    async fn query(&self, goal: &str) -> EngineResult<Vec<Solution>> {
        let program = self.program.as_ref().ok_or(EngineError::NotConsulted)?;
        let file = program.to_string_lossy();
        let output = self.run(QUERY_GOAL, &[], &[file.as_ref(), goal]).await?;

        if !output.status.success() {
            return Err(EngineError::QueryFailed(stderr_text(&output)));
        }
        parse_solutions(&String::from_utf8_lossy(&output.stdout))
    }
}

fn stderr_text(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if text.is_empty() {
        format!("swipl exited with {}", output.status)
    } else {
        text
    }
}

/// Decodes the marked solution lines; anything else the program printed is ignored.
pub fn parse_solutions(stdout: &str) -> EngineResult<Vec<Solution>> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix(SOLUTION_MARKER))
        .map(|row| {
            let pairs: Vec<(String, String)> = serde_json::from_str(row)
                .map_err(|e| EngineError::InvalidOutput(format!("{}: {}", e, row)))?;
            Ok(Solution::new(
                pairs
                    .into_iter()
                    .map(|(variable, value)| Binding { variable, value })
                    .collect(),
            ))
        })
        .collect()
}
