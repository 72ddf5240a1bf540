use std::collections::HashMap;

use oncocare_core::models::prompt::PromptAnswerPair;
use tracing::info;

use crate::error::EvalError;
use crate::scoring::{Accuracy, EvaluationReport, PromptOutcome};

/// Score produced answers against expected ones.
///
/// Prompts that repeat collapse to their last answer. Produced prompts with
/// no expected counterpart are ignored.
pub fn evaluate(
    expected: &[PromptAnswerPair],
    produced: &[PromptAnswerPair],
) -> Result<Accuracy, EvalError> {
    Ok(evaluate_report(expected, produced)?.accuracy)
}

/// Like [`evaluate`], also returning the outcome for every expected prompt.
pub fn evaluate_report(
    expected: &[PromptAnswerPair],
    produced: &[PromptAnswerPair],
) -> Result<EvaluationReport, EvalError> {
    if expected.is_empty() {
        return Err(EvalError::EmptyExpectedSet);
    }

    let expected = AnswerMap::build(expected);
    let produced = AnswerMap::build(produced);

    let outcomes: Vec<PromptOutcome> = expected
        .iter()
        .map(|(prompt, expected_answer)| match produced.get(prompt) {
            Some(produced_answer) if answers_match(expected_answer, produced_answer) => {
                PromptOutcome::Matched {
                    prompt: prompt.to_string(),
                }
            }
            Some(produced_answer) => PromptOutcome::Mismatched {
                prompt: prompt.to_string(),
                expected: expected_answer.to_string(),
                produced: produced_answer.to_string(),
            },
            None => PromptOutcome::Missing {
                prompt: prompt.to_string(),
                expected: expected_answer.to_string(),
            },
        })
        .collect();

    let correct = outcomes.iter().filter(|o| o.is_match()).count();
    let accuracy = Accuracy::new(correct, outcomes.len()).ok_or(EvalError::EmptyExpectedSet)?;

    info!(
        correct,
        total = accuracy.total(),
        accuracy = accuracy.ratio(),
        "evaluated answers"
    );

    Ok(EvaluationReport { accuracy, outcomes })
}

fn answers_match(expected: &str, produced: &str) -> bool {
    expected.to_lowercase() == produced.to_lowercase()
}

/// Prompt → trimmed answer, last write wins, iterated in first-seen order.
struct AnswerMap<'a> {
    order: Vec<&'a str>,
    answers: HashMap<&'a str, &'a str>,
}

impl<'a> AnswerMap<'a> {
    fn build(pairs: &'a [PromptAnswerPair]) -> Self {
        let mut order = Vec::new();
        let mut answers = HashMap::with_capacity(pairs.len());
        for pair in pairs {
            if answers
                .insert(pair.prompt.as_str(), pair.answer.trim())
                .is_none()
            {
                order.push(pair.prompt.as_str());
            }
        }
        Self { order, answers }
    }

    fn get(&self, prompt: &str) -> Option<&'a str> {
        self.answers.get(prompt).copied()
    }

    fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.order.iter().map(|prompt| (*prompt, self.answers[prompt]))
    }
}
