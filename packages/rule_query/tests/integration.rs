/// Integration tests for the rule/query pipeline
///
/// Both collaborators are replaced by scripted stand-ins so every assertion is
/// deterministic: the LLM replies are canned and the engine returns fixed
/// solution sets while recording what it was asked to consult.

use rule_query::application::runner::run_cases;
use rule_query::application::transcript::{OutputMode, Transcript};
use rule_query::domain::errors::{EngineError, LlmError, OrchestratorError};
use rule_query::domain::models::{Binding, QueryOutcome, SessionConfig, SessionState, Solution, TestCase, Verdict};
use rule_query::domain::services::{strip_code_fences, RuleQuerySession, ScratchFile, ScriptedEngine, ScriptedLlmClient};
use std::path::Path;

const FENCED_PROGRAM: &str = r#"```prolog
% check_valid(+Goal, -Result)
check_valid(Goal, 'True') :- call(Goal), !.
check_valid(_Goal, 'False').

complete_passenger(p(First, Last, Dob)) :- First \== '', Last \== '', Dob \== ''.
valid_passengers(Ps) :- length(Ps, N), N =< 5, forall(member(P, Ps), complete_passenger(P)).
```"#;

const THREE_PASSENGERS: &str = "check_valid(valid_passengers([p('John','Doe','1990-01-01'), p('Jane','Doe','1991-02-02'), p('Alice','Smith','1992-03-03')]), Result)";

const SIX_PASSENGERS: &str = "check_valid(valid_passengers([p('John','Doe','1990-01-01'), p('Jane','Doe','1991-02-02'), p('Alice','Smith','1992-03-03'), p('Bob','Brown','1993-04-04'), p('Carol','White','1994-05-05'), p('David','Black','')]), Result)";

fn config(dir: &Path) -> SessionConfig {
    SessionConfig {
        scratch_dir: dir.to_path_buf(),
        ..SessionConfig::default()
    }
}

fn validity(value: &str) -> Solution {
    Solution::new(vec![Binding::new("Result", value)])
}

fn session_with(
    dir: &Path,
    replies: Vec<Result<String, LlmError>>,
    answers: Vec<Result<Vec<Solution>, EngineError>>,
) -> RuleQuerySession<ScriptedLlmClient, ScriptedEngine> {
    RuleQuerySession::new(ScriptedLlmClient::new(replies), ScriptedEngine::new(answers), config(dir)).unwrap()
}

#[tokio::test]
async fn test_scenario_three_passengers_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with(
        dir.path(),
        vec![Ok(FENCED_PROGRAM.to_string()), Ok(format!("```\n{}\n```", THREE_PASSENGERS))],
        vec![Ok(vec![validity("True")])],
    );
    session.load_rules("at most 5 passengers with first name, last name and date of birth").await.unwrap();

    let query = session
        .translate_query("Verify that John Doe, Jane Doe and Alice Smith form a valid reservation")
        .await
        .unwrap();
    assert_eq!(query, THREE_PASSENGERS);

    let outcome = session.query(&query).await.unwrap();
    assert!(!outcome.is_empty());
    assert_eq!(outcome.solutions()[0].validity(), Some(true));
    assert_eq!(outcome.verdict(), Verdict::Holds);
    assert_eq!(session.engine().goals(), vec![THREE_PASSENGERS.to_string()]);
}

#[tokio::test]
async fn test_scenario_six_passengers_is_rejected() {
    // the engine may answer with an explicit 'False' or with no solution at all
    for answer in [vec![validity("False")], vec![]] {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(
            dir.path(),
            vec![Ok(FENCED_PROGRAM.to_string()), Ok(SIX_PASSENGERS.to_string())],
            vec![Ok(answer)],
        );
        session.load_rules("at most 5 passengers").await.unwrap();

        let query = session.translate_query("six passengers, one missing a birth date").await.unwrap();
        let outcome = session.query(&query).await.unwrap();
        assert!(matches!(outcome.verdict(), Verdict::Fails | Verdict::NoSolution));
    }
}

#[tokio::test]
async fn test_scenario_six_passengers_engine_error_is_not_an_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with(
        dir.path(),
        vec![Ok(FENCED_PROGRAM.to_string()), Ok(SIX_PASSENGERS.to_string())],
        vec![Err(EngineError::QueryFailed(
            "procedure valid_passenger/1 does not exist".to_string(),
        ))],
    );
    session.load_rules("at most 5 passengers").await.unwrap();

    let query = session.translate_query("six passengers").await.unwrap();
    let err = session.query(&query).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Engine(EngineError::QueryFailed(_))));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_scenario_llm_failure_during_compilation_is_detectable() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with(
        dir.path(),
        vec![Err(LlmError::Status {
            code: 503,
            body: "service unavailable".to_string(),
        })],
        vec![],
    );

    let err = session.load_rules("at most 5 passengers").await.unwrap_err();
    assert!(err.to_string().contains("Error calling LLM model='o3-mini'"));
    assert!(matches!(err, OrchestratorError::LlmCall { .. }));

    // the failure text never became program source
    assert!(session.engine().consulted().is_empty());
    assert!(session.program().is_none());
    assert_eq!(std::fs::read_to_string(session.scratch_path().unwrap()).unwrap(), "");
    assert_eq!(session.state(), SessionState::Created);
}

#[tokio::test]
async fn test_consulted_content_is_fence_stripped_reply() {
    let replies = [
        FENCED_PROGRAM,
        "plain(fact).\nrule(X) :- plain(X).",
        "Here is the code:\n```prolog\na(1).\n```\n```\nb(2).\n```",
        "   ```pl\n\n  c(3).\n   ```   \n",
    ];

    for raw in replies {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(dir.path(), vec![Ok(raw.to_string())], vec![]);
        session.load_rules("rules").await.unwrap();

        let (_, consulted) = &session.engine().consulted()[0];
        assert_eq!(consulted, &strip_code_fences(raw));
        assert_eq!(session.program(), Some(consulted.as_str()));
    }
}

#[tokio::test]
async fn test_scratch_allocation_avoids_populated_names() {
    let dir = tempfile::tempdir().unwrap();
    let taken: Vec<String> = (0..20).map(|i| format!("taken-{}", i)).collect();
    for stem in &taken {
        std::fs::write(dir.path().join(format!("{}.pl", stem)), "keep.").unwrap();
    }

    let mut candidates = taken.clone().into_iter().chain(std::iter::once("fresh".to_string()));
    let scratch = ScratchFile::allocate_with(dir.path(), "pl", || candidates.next().unwrap()).unwrap();
    assert_eq!(scratch.path(), dir.path().join("fresh.pl"));
    for stem in &taken {
        let contents = std::fs::read_to_string(dir.path().join(format!("{}.pl", stem))).unwrap();
        assert_eq!(contents, "keep.");
    }
}

#[tokio::test]
async fn test_clean_up_leaves_no_scratch_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with(dir.path(), vec![Ok("a(1).".to_string())], vec![]);
    session.load_rules("rules").await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    session.clean_up().await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let second = session.clean_up().await;
    assert!(matches!(second, Err(OrchestratorError::SessionClosed)));
}

#[tokio::test]
async fn test_run_cases_continues_after_case_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_with(
        dir.path(),
        vec![
            Ok(FENCED_PROGRAM.to_string()),
            Ok("?- broken(".to_string()),
            Ok(THREE_PASSENGERS.to_string()),
        ],
        vec![Ok(vec![validity("True")])],
    );
    let cases = vec![
        TestCase::new("Broken", "a question the model answers badly"),
        TestCase::new("Passengers", "three complete passengers"),
    ];

    let transcript = Transcript::new(OutputMode::JsonLines);
    let reports = run_cases(&mut session, "rules", &cases, &transcript).await.unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports[0].error.as_deref().unwrap().contains("must not start with ?-"));
    assert_eq!(reports[1].verdict, Some(Verdict::Holds));
    assert_eq!(reports[1].outcome, Some(QueryOutcome::Solved(vec![validity("True")])));
    // the rejected query never reached the engine
    assert_eq!(session.engine().goals().len(), 1);
}

#[tokio::test]
async fn test_run_cases_stops_on_consult_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = RuleQuerySession::new(
        ScriptedLlmClient::new(vec![Ok("broken(".to_string())]),
        ScriptedEngine::failing_consult(EngineError::ConsultFailed {
            path: "x.pl".to_string(),
            message: "syntax error: operator expected".to_string(),
        }),
        config(dir.path()),
    )
    .unwrap();

    let transcript = Transcript::new(OutputMode::JsonLines);
    let err = run_cases(&mut session, "rules", &[TestCase::new("t", "q")], &transcript)
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(session.state(), SessionState::Created);
    assert_eq!(session.llm().call_count(), 1);
}
