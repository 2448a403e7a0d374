use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Variable binding from one query solution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Binding {
    pub variable: String,
    pub value: String,
}

impl Binding {
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
        }
    }

    /// Reads the value as a `check_valid` result term, if it is one.
    pub fn as_truth(&self) -> Option<bool> {
        let value = self.value.trim().trim_matches('\'');
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

/// One binding set: every named query variable and the value it took
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Solution {
    pub bindings: Vec<Binding>,
}

impl Solution {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.variable == variable)
            .map(|b| b.value.as_str())
    }

    /// Combined validity of all truth-valued bindings.
    ///
    /// Any `False` wins over `True`; `None` when no binding is a truth term.
    pub fn validity(&self) -> Option<bool> {
        let mut verdict = None;
        for truth in self.bindings.iter().filter_map(Binding::as_truth) {
            if !truth {
                return Some(false);
            }
            verdict = Some(true);
        }
        verdict
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{{")?;
        for (idx, binding) in self.bindings.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", binding.variable, binding.value)?;
        }
        write!(f, "}}")
    }
}

/// Result of executing one goal.
///
/// A goal that fails is a normal outcome and is kept apart from engine errors,
/// which travel through `EngineError` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "solutions", rename_all = "snake_case")]
pub enum QueryOutcome {
    Solved(Vec<Solution>),
    NoSolution,
}

impl QueryOutcome {
    pub fn from_solutions(solutions: Vec<Solution>) -> Self {
        if solutions.is_empty() {
            QueryOutcome::NoSolution
        } else {
            QueryOutcome::Solved(solutions)
        }
    }

    pub fn solutions(&self) -> &[Solution] {
        match self {
            QueryOutcome::Solved(solutions) => solutions,
            QueryOutcome::NoSolution => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QueryOutcome::NoSolution)
    }

    pub fn verdict(&self) -> Verdict {
        let solutions = match self {
            QueryOutcome::NoSolution => return Verdict::NoSolution,
            QueryOutcome::Solved(solutions) => solutions,
        };
        // a ground goal that succeeds binds nothing; success is the answer
        if solutions.iter().all(|s| s.bindings.is_empty()) {
            return Verdict::Holds;
        }
        let validities: Vec<bool> = solutions.iter().filter_map(Solution::validity).collect();
        if validities.is_empty() {
            Verdict::Unknown
        } else if validities.iter().all(|v| *v) {
            Verdict::Holds
        } else {
            Verdict::Fails
        }
    }
}

impl Display for QueryOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[")?;
        for (idx, solution) in self.solutions().iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", solution)?;
        }
        write!(f, "]")
    }
}

/// How a query outcome reads under the `check_valid` convention
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every truth-valued binding is `True`
    Holds,
    /// At least one truth-valued binding is `False`
    Fails,
    /// The goal had no solutions
    NoSolution,
    /// Solutions exist but none carries a truth term (e.g. a computed fee)
    Unknown,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Verdict::Holds => "holds",
            Verdict::Fails => "fails",
            Verdict::NoSolution => "no solution",
            Verdict::Unknown => "no validity term",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(pairs: &[(&str, &str)]) -> Solution {
        Solution::new(pairs.iter().map(|(k, v)| Binding::new(*k, *v)).collect())
    }

    #[test]
    fn test_truth_terms() {
        assert_eq!(Binding::new("R", "True").as_truth(), Some(true));
        assert_eq!(Binding::new("R", "'False'").as_truth(), Some(false));
        assert_eq!(Binding::new("R", "false").as_truth(), Some(false));
        assert_eq!(Binding::new("Fee", "100").as_truth(), None);
    }

    #[test]
    fn test_solution_validity_false_wins() {
        let s = solution(&[("Passengers", "True"), ("Payment", "False"), ("Fee", "150")]);
        assert_eq!(s.validity(), Some(false));

        let s = solution(&[("Passengers", "True"), ("Fee", "150")]);
        assert_eq!(s.validity(), Some(true));

        let s = solution(&[("Fee", "150")]);
        assert_eq!(s.validity(), None);
    }

    #[test]
    fn test_outcome_from_empty_is_no_solution() {
        let outcome = QueryOutcome::from_solutions(Vec::new());
        assert_eq!(outcome, QueryOutcome::NoSolution);
        assert!(outcome.is_empty());
        assert_eq!(outcome.verdict(), Verdict::NoSolution);
        assert_eq!(outcome.to_string(), "[]");
    }

    #[test]
    fn test_outcome_verdicts() {
        let holds = QueryOutcome::from_solutions(vec![solution(&[("Result", "True")])]);
        assert_eq!(holds.verdict(), Verdict::Holds);

        let fails = QueryOutcome::from_solutions(vec![
            solution(&[("Result", "True")]),
            solution(&[("Result", "False")]),
        ]);
        assert_eq!(fails.verdict(), Verdict::Fails);

        let unknown = QueryOutcome::from_solutions(vec![solution(&[("Fee", "100")])]);
        assert_eq!(unknown.verdict(), Verdict::Unknown);
    }

    #[test]
    fn test_ground_goal_success_holds() {
        let outcome = QueryOutcome::from_solutions(vec![Solution::default()]);
        assert_eq!(outcome.verdict(), Verdict::Holds);

        // a computed value without a truth term stays unknown
        let fee = QueryOutcome::from_solutions(vec![Solution::default(), solution(&[("Fee", "50")])]);
        assert_eq!(fee.verdict(), Verdict::Unknown);
    }

    #[test]
    fn test_display() {
        let outcome = QueryOutcome::from_solutions(vec![
            solution(&[("Valid", "True"), ("Fee", "100")]),
            Solution::default(),
        ]);
        assert_eq!(outcome.to_string(), "[{Valid: True, Fee: 100}, {}]");
        assert_eq!(outcome.solutions()[0].get("Fee"), Some("100"));
        assert_eq!(outcome.solutions()[0].get("Missing"), None);
    }

    #[test]
    fn test_serialization_shape() {
        let outcome = QueryOutcome::from_solutions(vec![solution(&[("X", "1")])]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "solved");
        assert_eq!(json["solutions"][0]["bindings"][0]["variable"], "X");

        let json = serde_json::to_value(QueryOutcome::NoSolution).unwrap();
        assert_eq!(json["status"], "no_solution");
    }
}
