//! Prompt templates sent to the completion model.

/// Reference definition of the `check_valid` convention, embedded in the rule
/// prompt so generated validations return `'True'`/`'False'` instead of
/// failing.
pub const CHECK_VALID_CONVENTION: &str =
    "% check_valid(+Goal, -Result) check_valid(Goal, 'True') :- call(Goal), !. check_valid(_Goal, 'False').";

pub fn rules_to_program(rules_text: &str) -> String {
    format!(
        "You are an expert in Prolog logic programming. Given the following business rules, \
generate equivalent Prolog code. \
Always use a check_valid predicate to return True or False instead of prolog default behavior of pass or fail for validations.\n\n\
{CHECK_VALID_CONVENTION}\n\n\
The rules are:\n\n\
{rules_text}\n\n\
Output only valid Prolog code (do not include markdown formatting)."
    )
}

pub fn question_to_query(program: &str, question: &str) -> String {
    format!(
        "You are an expert in Prolog and you have been given a dynamically generated Prolog program \
designed to encode the following business rules:\n\n\
{program}\n\n\
Based on this logic, convert the following English test case description into a valid Prolog query \
suitable to be executed as a single goal (which means it should never start with ?-, must not end with a period, \
and must be without explanations or extra commentary). \
Response code must bind any computed results to variables so that they can be extracted upon query execution. \
Output only the Prolog query without any markdown formatting.\n\n\
English description: {question}"
    )
}

pub fn narrate_answer(question: &str, query: &str, results: &str) -> String {
    format!(
        "A user asked the following question about a set of business rules:\n\n\
{question}\n\n\
The question was checked with this formal query:\n\n\
{query}\n\n\
which produced these raw results (an empty list means the check did not succeed):\n\n\
{results}\n\n\
Write a short, plain-language answer to the user's question based on these results. \
Do not mention Prolog, queries, predicates, variables or any other detail of how the answer was obtained."
    )
}
