//! Prompt construction for discussion and comment digests.

use crate::discussion::Comment;

/// System instruction sent with every request. Describes both reply shapes.
pub const SYSTEM_PROMPT: &str = r#"You are a medical discussion summarizer for busy physicians. Be extremely concise and clinically precise.

For FULL DISCUSSION summaries, respond in this exact JSON format:
{
  "tldr": "One sentence clinical bottom line (max 20 words)",
  "consensus": ["Point 1", "Point 2", "Point 3"],
  "keyInsights": [{"author": "Dr. Name", "insight": "brief insight"}],
  "actionItems": ["Action 1", "Action 2"]
}

For SINGLE COMMENT summaries, respond in this exact JSON format:
{
  "summary": "2-3 sentence summary of this comment's clinical point",
  "keyPoint": "The single most important takeaway in one sentence"
}

Always respond with valid JSON only, no markdown."#;

/// Render comments as `Author (Specialty): text`, separated by blank lines.
pub fn transcript(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("{} ({}): {}", c.author, c.specialty, c.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn discussion_prompt(comments: &[Comment]) -> String {
    format!(
        "Summarize this medical discussion:\n\n{}",
        transcript(comments)
    )
}

pub fn comment_prompt(comment: &Comment) -> String {
    format!(
        "Summarize this single medical comment by {} ({}):\n\n\"{}\"",
        comment.author, comment.specialty, comment.text
    )
}
