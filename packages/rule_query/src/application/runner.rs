//! Drives a session through a rules text and a list of test cases.

use crate::application::demo::{sample_cases, SAMPLE_RULES};
use crate::application::transcript::Transcript;
use crate::domain::errors::OrchestratorResult;
use crate::domain::models::{CaseReport, TestCase};
use crate::domain::services::{LlmClient, LogicEngine, RuleQuerySession};
use anyhow::{bail, Context};
use std::path::Path;

pub async fn load_rules_text(path: Option<&Path>) -> anyhow::Result<String> {
    let Some(path) = path else {
        return Ok(SAMPLE_RULES.to_string());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading rules file {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("rules file {} is empty", path.display());
    }
    Ok(text)
}

pub async fn load_cases(path: Option<&Path>) -> anyhow::Result<Vec<TestCase>> {
    let Some(path) = path else {
        return Ok(sample_cases());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading cases file {}", path.display()))?;
    let cases: Vec<TestCase> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing cases file {}", path.display()))?;
    if cases.is_empty() {
        bail!("cases file {} contains no test cases", path.display());
    }
    Ok(cases)
}

/// Loads the rules, then runs every case in order.
///
/// Stops at the first error that leaves the session unusable. The session is
/// not cleaned up here; the caller owns that.
pub async fn run_cases<L: LlmClient, E: LogicEngine>(
    session: &mut RuleQuerySession<L, E>,
    rules_text: &str,
    cases: &[TestCase],
    transcript: &Transcript,
) -> OrchestratorResult<Vec<CaseReport>> {
    transcript.info("Generating Prolog code from provided rules...");
    session.load_rules(rules_text).await?;
    if let Some(path) = session.scratch_path() {
        transcript.info(&format!("Consulted generated Prolog file: {}", path.display()));
    }

    transcript.heading("Test cases");
    let mut reports = Vec::with_capacity(cases.len());
    for (index, case) in cases.iter().enumerate() {
        transcript.case_started(index, case);
        let report = session.run_case(case).await?;
        transcript.case_finished(&report);
        reports.push(report);
    }
    transcript.summary(&reports);
    Ok(reports)
}

/// Combines the run result with the cleanup that always follows it.
///
/// `None` means the run was interrupted. A run error takes precedence over a
/// cleanup error, which is logged instead of being lost.
pub fn settle_run(
    outcome: Option<OrchestratorResult<Vec<CaseReport>>>,
    cleanup: OrchestratorResult<()>,
) -> OrchestratorResult<Option<Vec<CaseReport>>> {
    match outcome {
        Some(Ok(reports)) => {
            cleanup?;
            Ok(Some(reports))
        }
        Some(Err(e)) => {
            if let Err(cleanup_error) = cleanup {
                tracing::error!(error = %cleanup_error, "cleanup failed after run error");
            }
            Err(e)
        }
        None => {
            cleanup?;
            Ok(None)
        }
    }
}
