use oncocare_core::models::prompt::PromptAnswerPair;

/// Render pairs as `"<prompt> - <answer>"` lines for display or copying.
pub fn render_transcript(pairs: &[PromptAnswerPair]) -> String {
    pairs
        .iter()
        .map(|p| format!("{} - {}", p.prompt, p.answer))
        .collect::<Vec<_>>()
        .join("\n")
}
