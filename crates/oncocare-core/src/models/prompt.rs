use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::text;

/// A question and its answer, either extracted from a record or produced
/// by an answer-generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptAnswerPair {
    pub prompt: String,
    /// Non-string scalars in produced documents are kept as their text.
    #[serde(default, deserialize_with = "text::lenient_text")]
    pub answer: String,
}

impl PromptAnswerPair {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// Parse a JSON array of `{prompt, answer}` objects.
    pub fn parse_list(document: &str) -> Result<Vec<Self>, CoreError> {
        Ok(serde_json::from_str(document)?)
    }
}
