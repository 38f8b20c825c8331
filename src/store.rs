//! In-memory discussion store.
//!
//! Holds the ordered comments, the per-comment summary cache and the current
//! discussion summary. Nothing is persisted; state lives as long as the session.

use crate::discussion::{Comment, CommentId, CommentSummary, DiscussionSummary, NewComment};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Specialty recorded when the author leaves the field blank
pub const UNKNOWN_SPECIALTY: &str = "Unknown";

/// Time label given to freshly posted comments
pub const JUST_NOW: &str = "Just now";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppendError {
    #[error("a comment needs an author")]
    MissingAuthor,
    #[error("a comment needs some text")]
    MissingText,
}

/// The discussion thread and its cached digests.
#[derive(Debug, Default, Clone)]
pub struct Discussion {
    comments: Vec<Comment>,
    comment_summaries: HashMap<CommentId, CommentSummary>,
    summary: Option<DiscussionSummary>,
    revision: u64,
}

impl Discussion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing thread, e.g. the sample case
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            ..Self::default()
        }
    }

    /// Append a new comment at the end of the thread.
    ///
    /// Blank specialties become [`UNKNOWN_SPECIALTY`]. The discussion summary is
    /// cleared because it no longer covers every comment.
    pub fn append(&mut self, draft: NewComment) -> Result<CommentId, AppendError> {
        let author = draft.author.trim();
        let text = draft.text.trim();
        if author.is_empty() {
            return Err(AppendError::MissingAuthor);
        }
        if text.is_empty() {
            return Err(AppendError::MissingText);
        }
        let specialty = match draft.specialty.trim() {
            "" => UNKNOWN_SPECIALTY,
            other => other,
        };

        let id = self.next_id();
        self.comments.push(Comment {
            id,
            author: author.to_string(),
            specialty: specialty.to_string(),
            time: JUST_NOW.to_string(),
            text: text.to_string(),
        });
        self.summary = None;
        self.revision += 1;
        debug!(%id, comments = self.comments.len(), "appended comment");
        Ok(id)
    }

    /// Cache the summary of one comment.
    ///
    /// First write wins: returns `false` and leaves the cache untouched when an
    /// entry already exists or when no comment has that id.
    pub fn record_comment_summary(&mut self, id: CommentId, summary: CommentSummary) -> bool {
        if self.get(id).is_none() || self.comment_summaries.contains_key(&id) {
            return false;
        }
        self.comment_summaries.insert(id, summary);
        true
    }

    /// Overwrite the discussion summary; the last call wins.
    pub fn replace_discussion_summary(&mut self, summary: DiscussionSummary) {
        self.summary = Some(summary);
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == id)
    }

    pub fn comment_summary(&self, id: CommentId) -> Option<&CommentSummary> {
        self.comment_summaries.get(&id)
    }

    pub fn discussion_summary(&self) -> Option<&DiscussionSummary> {
        self.summary.as_ref()
    }

    /// Bumped on every append. A summary built at an older revision does not
    /// cover the whole thread.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Number of distinct authors in the thread
    pub fn participants(&self) -> usize {
        self.comments
            .iter()
            .map(|comment| comment.author.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Time-derived id, bumped past the largest id in use so ids stay unique
    /// and increasing even within one millisecond.
    fn next_id(&self) -> CommentId {
        let now = Utc::now().timestamp_millis();
        let floor = self
            .comments
            .iter()
            .map(|comment| comment.id.0)
            .max()
            .map_or(i64::MIN, |max| max.saturating_add(1));
        CommentId(now.max(floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::sample_discussion;

    fn digest(tldr: &str) -> DiscussionSummary {
        DiscussionSummary {
            tldr: tldr.to_string(),
            ..DiscussionSummary::default()
        }
    }

    #[test]
    fn append_preserves_order_and_assigns_distinct_ids() {
        let mut discussion = Discussion::new();
        let mut ids = Vec::new();
        for n in 0..50 {
            let id = discussion
                .append(NewComment::new(format!("Dr. {n}"), "Cardiology", "text"))
                .unwrap();
            ids.push(id);
        }

        assert_eq!(discussion.len(), 50);
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 50);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

        let authors: Vec<_> = discussion.comments().iter().map(|c| c.author.clone()).collect();
        let expected: Vec<_> = (0..50).map(|n| format!("Dr. {n}")).collect();
        assert_eq!(authors, expected);
    }

    #[test]
    fn append_fills_unknown_specialty_and_clears_summary() {
        let mut discussion = Discussion::with_comments(sample_discussion());
        discussion.replace_discussion_summary(digest("old"));

        let id = discussion.append(NewComment::new("Dr. Test", "", "hello")).unwrap();

        let comment = discussion.get(id).unwrap();
        assert_eq!(comment.author, "Dr. Test");
        assert_eq!(comment.specialty, UNKNOWN_SPECIALTY);
        assert_eq!(comment.time, JUST_NOW);
        assert_eq!(comment.text, "hello");
        assert!(discussion.discussion_summary().is_none());
        assert_eq!(discussion.comments().last().unwrap().id, id);
        assert!(id > CommentId(10));
    }

    #[test]
    fn append_rejects_drafts_without_author_or_text() {
        let mut discussion = Discussion::with_comments(sample_discussion());
        discussion.replace_discussion_summary(digest("kept"));

        assert_eq!(
            discussion.append(NewComment::new("  ", "Cardiology", "hello")),
            Err(AppendError::MissingAuthor)
        );
        assert_eq!(
            discussion.append(NewComment::new("Dr. Test", "Cardiology", "")),
            Err(AppendError::MissingText)
        );
        assert_eq!(discussion.len(), 10);
        assert_eq!(discussion.discussion_summary().unwrap().tldr, "kept");
    }

    #[test]
    fn comment_summary_first_write_wins() {
        let mut discussion = Discussion::with_comments(sample_discussion());
        let first = CommentSummary {
            summary: "first".to_string(),
            key_point: "a".to_string(),
        };
        let second = CommentSummary {
            summary: "second".to_string(),
            key_point: "b".to_string(),
        };

        assert!(discussion.record_comment_summary(CommentId(3), first.clone()));
        assert!(!discussion.record_comment_summary(CommentId(3), second));
        assert_eq!(discussion.comment_summary(CommentId(3)), Some(&first));
    }

    #[test]
    fn comment_summary_for_unknown_id_is_ignored() {
        let mut discussion = Discussion::with_comments(sample_discussion());
        assert!(!discussion.record_comment_summary(CommentId(999), CommentSummary::default()));
        assert!(discussion.comment_summary(CommentId(999)).is_none());
    }

    #[test]
    fn discussion_summary_last_write_wins() {
        let mut discussion = Discussion::new();
        discussion.replace_discussion_summary(digest("one"));
        discussion.replace_discussion_summary(digest("two"));
        assert_eq!(discussion.discussion_summary().unwrap().tldr, "two");
    }

    #[test]
    fn revision_moves_only_on_successful_append() {
        let mut discussion = Discussion::with_comments(sample_discussion());
        assert_eq!(discussion.revision(), 0);

        discussion.append(NewComment::new("Dr. Test", "", "hello")).unwrap();
        assert_eq!(discussion.revision(), 1);

        let _ = discussion.append(NewComment::new("", "", "hello"));
        discussion.replace_discussion_summary(digest("x"));
        discussion.record_comment_summary(CommentId(1), CommentSummary::default());
        assert_eq!(discussion.revision(), 1);
    }

    #[test]
    fn participants_counts_distinct_authors() {
        let discussion = Discussion::with_comments(sample_discussion());
        assert_eq!(discussion.participants(), 6);
    }
}
