use crate::domain::models::solution::{QueryOutcome, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Lifecycle of a rule/query session.
///
/// `Created -> RulesLoaded -> Querying* -> CleanedUp`; `CleanedUp` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Created,
    RulesLoaded,
    Querying,
    CleanedUp,
}

impl SessionState {
    pub fn accepts_queries(&self) -> bool {
        matches!(self, SessionState::RulesLoaded | SessionState::Querying)
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            SessionState::Created => "CREATED",
            SessionState::RulesLoaded => "RULES_LOADED",
            SessionState::Querying => "QUERYING",
            SessionState::CleanedUp => "CLEANED_UP",
        };
        write!(f, "{}", label)
    }
}

/// A natural-language test question to run against the loaded rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    pub title: String,
    pub question: String,
}

impl TestCase {
    pub fn new(title: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            question: question.into(),
        }
    }
}

/// Everything observed while running one test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub title: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<QueryOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub executed_at: chrono::DateTime<chrono::Utc>,
}

impl CaseReport {
    pub fn new(case: &TestCase) -> Self {
        Self {
            title: case.title.clone(),
            question: case.question.clone(),
            query: None,
            outcome: None,
            verdict: None,
            narration: None,
            error: None,
            executed_at: chrono::Utc::now(),
        }
    }

    pub fn set_outcome(&mut self, outcome: QueryOutcome) {
        self.verdict = Some(outcome.verdict());
        self.outcome = Some(outcome);
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
