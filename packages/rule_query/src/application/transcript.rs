//! Console transcript on stdout.
//!
//! Diagnostics go through `tracing` to stderr; this is what the user reads.

use crate::domain::models::{CaseReport, TestCase, Verdict};

const RULE: &str = "********************************************************************************";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Transcript,
    JsonLines,
}

pub struct Transcript {
    mode: OutputMode,
}

impl Transcript {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn info(&self, message: &str) {
        if self.mode == OutputMode::Transcript {
            println!("\n[INFO] {}", message);
        }
    }

    pub fn heading(&self, title: &str) {
        if self.mode == OutputMode::Transcript {
            println!("\n{}", title.to_uppercase());
        }
    }

    pub fn case_started(&self, index: usize, case: &TestCase) {
        if self.mode == OutputMode::Transcript {
            println!("{}", RULE);
            println!("Example {}: {}", index + 1, case.title);
            println!("{}", case.question);
        }
    }

    pub fn case_finished(&self, report: &CaseReport) {
        match self.mode {
            OutputMode::Transcript => println!("{}", render_report(report)),
            OutputMode::JsonLines => match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!(error = %e, "could not serialize report"),
            },
        }
    }

    pub fn summary(&self, reports: &[CaseReport]) {
        if self.mode == OutputMode::Transcript {
            println!("{}", RULE);
            println!("{}", render_summary(reports));
        }
    }
}

pub fn render_report(report: &CaseReport) -> String {
    let mut out = String::new();
    if let Some(query) = &report.query {
        out.push_str(&format!("\n[INFO] Executing Prolog query: {}\n", query));
    }
    if let Some(error) = &report.error {
        out.push_str(&format!("\n[ERROR] {}", error));
        return out;
    }
    out.push_str(&format!("\n[RESULT] {} Query Results:\n", report.title));
    if let Some(outcome) = &report.outcome {
        out.push_str(&outcome.to_string());
    }
    if let Some(verdict) = report.verdict {
        out.push_str(&format!("\n[VERDICT] {}", verdict));
    }
    if let Some(narration) = &report.narration {
        out.push_str(&format!("\n\n[ANSWER] {}", narration));
    }
    out
}

pub fn render_summary(reports: &[CaseReport]) -> String {
    let count = |verdict: Verdict| reports.iter().filter(|r| r.verdict == Some(verdict)).count();
    format!(
        "{} case(s): {} hold, {} fail, {} without solution, {} without validity term, {} error(s)",
        reports.len(),
        count(Verdict::Holds),
        count(Verdict::Fails),
        count(Verdict::NoSolution),
        count(Verdict::Unknown),
        reports.iter().filter(|r| r.is_failure()).count(),
    )
}
