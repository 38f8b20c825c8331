//! Application state controller.
//!
//! `Session` owns the [`Discussion`] and the in-flight markers for both kinds of
//! summarization. Requests are split into `begin_*` (decide whether to send and
//! build the prompt) and `finish_*` (apply the settled result) so a UI can run
//! the network call on a background task without holding the state.

use crate::agent::{self, AgentError, Completion, FailureKind};
use crate::discussion::{CommentId, CommentSummary, DiscussionSummary, NewComment};
use crate::store::{AppendError, Discussion};
use tracing::{debug, info, warn};

/// What to do about a per-comment summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentRequest {
    /// Send this user prompt
    Send(String),
    /// A summary is already cached; nothing to send
    Cached,
    /// A comment summary is already in flight
    Busy,
    /// No comment has that id
    Unknown,
}

/// Which operation a failure notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Discussion,
    Comment(CommentId),
}

/// A failed summarization, kept for display until the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: Target,
    pub kind: FailureKind,
    pub detail: String,
}

impl Notice {
    fn from_error(target: Target, error: &AgentError) -> Self {
        Self {
            target,
            kind: error.kind(),
            detail: error.to_string(),
        }
    }

    /// Short user-facing description of the failure
    pub fn headline(&self) -> &'static str {
        match self.kind {
            FailureKind::Transport => "Summary service unreachable",
            FailureKind::Parse => "Summary reply was not valid JSON",
            FailureKind::Config => "Summary service not configured",
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    discussion: Discussion,
    summarizing_discussion: bool,
    /// Store revision the in-flight discussion prompt was built from
    summary_revision: u64,
    summarizing_comment: Option<CommentId>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(discussion: Discussion) -> Self {
        Self {
            discussion,
            ..Self::default()
        }
    }

    pub fn discussion(&self) -> &Discussion {
        &self.discussion
    }

    pub fn is_summarizing_discussion(&self) -> bool {
        self.summarizing_discussion
    }

    pub fn summarizing_comment(&self) -> Option<CommentId> {
        self.summarizing_comment
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Post a new comment. Clears the discussion summary on success.
    pub fn post(&mut self, draft: NewComment) -> Result<CommentId, AppendError> {
        self.discussion.append(draft)
    }

    /// Mark a discussion summary as in flight and return its prompt, or `None`
    /// when one is already running.
    pub fn begin_discussion_summary(&mut self) -> Option<String> {
        if self.summarizing_discussion {
            debug!("discussion summary already in flight");
            return None;
        }
        self.summarizing_discussion = true;
        self.summary_revision = self.discussion.revision();
        Some(crate::prompt::discussion_prompt(self.discussion.comments()))
    }

    /// Apply a settled discussion summary. Failures leave the previous summary.
    ///
    /// A summary whose prompt predates a posted comment is dropped, so the
    /// cleared state from the post stands.
    pub fn finish_discussion_summary(&mut self, result: Result<DiscussionSummary, AgentError>) {
        self.summarizing_discussion = false;
        match result {
            Ok(_) if self.discussion.revision() != self.summary_revision => {
                debug!(
                    started_at = self.summary_revision,
                    current = self.discussion.revision(),
                    "dropping discussion summary of an older thread"
                );
            }
            Ok(summary) => {
                info!(
                    consensus = summary.consensus.len(),
                    insights = summary.key_insights.len(),
                    "discussion summarized"
                );
                self.discussion.replace_discussion_summary(summary);
                self.clear_notice_for(Target::Discussion);
            }
            Err(error) => {
                warn!(error = %error, "discussion summary failed");
                self.notice = Some(Notice::from_error(Target::Discussion, &error));
            }
        }
    }

    /// Decide whether a comment needs summarizing and mark it in flight if so.
    pub fn begin_comment_summary(&mut self, id: CommentId) -> CommentRequest {
        let Some(comment) = self.discussion.get(id) else {
            return CommentRequest::Unknown;
        };
        if self.discussion.comment_summary(id).is_some() {
            debug!(%id, "comment summary cached");
            return CommentRequest::Cached;
        }
        if self.summarizing_comment.is_some() {
            return CommentRequest::Busy;
        }
        let prompt = crate::prompt::comment_prompt(comment);
        self.summarizing_comment = Some(id);
        CommentRequest::Send(prompt)
    }

    /// Apply a settled comment summary. Failures leave the cache untouched.
    pub fn finish_comment_summary(
        &mut self,
        id: CommentId,
        result: Result<CommentSummary, AgentError>,
    ) {
        if self.summarizing_comment == Some(id) {
            self.summarizing_comment = None;
        }
        match result {
            Ok(summary) => {
                self.discussion.record_comment_summary(id, summary);
                self.clear_notice_for(Target::Comment(id));
            }
            Err(error) => {
                warn!(%id, error = %error, "comment summary failed");
                self.notice = Some(Notice::from_error(Target::Comment(id), &error));
            }
        }
    }

    /// Summarize the whole discussion, waiting for the result.
    ///
    /// Returns `None` without calling the backend when a request is already in flight.
    pub async fn summarize_discussion(
        &mut self,
        backend: &dyn Completion,
    ) -> Option<Result<(), FailureKind>> {
        let prompt = self.begin_discussion_summary()?;
        let result: Result<DiscussionSummary, AgentError> = agent::request(backend, &prompt).await;
        let outcome = result.as_ref().map(|_| ()).map_err(AgentError::kind);
        self.finish_discussion_summary(result);
        Some(outcome)
    }

    /// Summarize one comment, waiting for the result. Cached comments return
    /// without calling the backend.
    pub async fn summarize_comment(
        &mut self,
        backend: &dyn Completion,
        id: CommentId,
    ) -> CommentOutcome {
        let prompt = match self.begin_comment_summary(id) {
            CommentRequest::Send(prompt) => prompt,
            CommentRequest::Cached => return CommentOutcome::Cached,
            CommentRequest::Busy => return CommentOutcome::Busy,
            CommentRequest::Unknown => return CommentOutcome::Unknown,
        };
        let result: Result<CommentSummary, AgentError> = agent::request(backend, &prompt).await;
        let outcome = match &result {
            Ok(_) => CommentOutcome::Summarized,
            Err(error) => CommentOutcome::Failed(error.kind()),
        };
        self.finish_comment_summary(id, result);
        outcome
    }

    fn clear_notice_for(&mut self, target: Target) {
        if self.notice.as_ref().is_some_and(|n| n.target == target) {
            self.notice = None;
        }
    }
}

/// Result of [`Session::summarize_comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOutcome {
    Summarized,
    Cached,
    Busy,
    Unknown,
    Failed(FailureKind),
}
