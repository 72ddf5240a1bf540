use std::fmt;

use serde::Serialize;

/// The share of expected prompts answered correctly, kept as a ratio of
/// counts so the exact value is never lost to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accuracy {
    correct: usize,
    total: usize,
}

impl Accuracy {
    /// Returns `None` when `total` is zero or `correct` exceeds it.
    pub fn new(correct: usize, total: usize) -> Option<Self> {
        (total > 0 && correct <= total).then_some(Self { correct, total })
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The accuracy in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.ratio() * 100.0)
    }
}

/// How one expected prompt fared against the produced answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromptOutcome {
    Matched {
        prompt: String,
    },
    Mismatched {
        prompt: String,
        expected: String,
        produced: String,
    },
    /// No produced answer carried this prompt.
    Missing {
        prompt: String,
        expected: String,
    },
}

impl PromptOutcome {
    pub fn prompt(&self) -> &str {
        match self {
            PromptOutcome::Matched { prompt }
            | PromptOutcome::Mismatched { prompt, .. }
            | PromptOutcome::Missing { prompt, .. } => prompt,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, PromptOutcome::Matched { .. })
    }
}

/// Accuracy plus the per-prompt outcomes behind it, one per distinct
/// expected prompt in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: Accuracy,
    pub outcomes: Vec<PromptOutcome>,
}

impl EvaluationReport {
    pub fn mismatches(&self) -> impl Iterator<Item = &PromptOutcome> {
        self.outcomes.iter().filter(|o| !o.is_match())
    }
}
