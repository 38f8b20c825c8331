//! TUI state: the session plus tab, selection, and compose-form state.
//!
//! Pure state. Rendering reads it and the key dispatcher mutates it.

use ratatui::widgets::ListState;

use crate::agent::AgentError;
use crate::discussion::{CommentId, DiscussionSummary, NewComment};
use crate::session::{CommentRequest, Session};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Discussion,
    Summary,
}

impl Tab {
    pub fn toggle(self) -> Self {
        match self {
            Tab::Discussion => Tab::Summary,
            Tab::Summary => Tab::Discussion,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a new comment
    Compose,
}

/// Field of the compose form that receives typed characters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    #[default]
    Author,
    Specialty,
    Text,
}

impl ComposeField {
    pub fn next(self) -> Self {
        match self {
            ComposeField::Author => ComposeField::Specialty,
            ComposeField::Specialty => ComposeField::Text,
            ComposeField::Text => ComposeField::Author,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ComposeField::Author => ComposeField::Text,
            ComposeField::Specialty => ComposeField::Author,
            ComposeField::Text => ComposeField::Specialty,
        }
    }
}

pub struct AppState {
    pub session: Session,
    pub tab: Tab,
    pub mode: Mode,
    /// Selection in the comment list
    pub list_state: ListState,
    pub draft: NewComment,
    pub field: ComposeField,
    /// Feedback from the compose form, e.g. a rejected draft
    pub hint: Option<String>,
    /// Advances on every tick; drives the spinner
    pub tick: usize,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        let selected = (!session.discussion().is_empty()).then_some(0);
        Self {
            session,
            tab: Tab::default(),
            mode: Mode::default(),
            list_state: ListState::default().with_selected(selected),
            draft: NewComment::default(),
            field: ComposeField::default(),
            hint: None,
            tick: 0,
        }
    }

    pub fn selected_id(&self) -> Option<CommentId> {
        let index = self.list_state.selected()?;
        self.session
            .discussion()
            .comments()
            .get(index)
            .map(|comment| comment.id)
    }

    pub fn select_next(&mut self) {
        let len = self.session.discussion().len();
        if len == 0 {
            return;
        }
        let next = self
            .list_state
            .selected()
            .map_or(0, |index| (index + 1).min(len - 1));
        self.list_state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.session.discussion().is_empty() {
            return;
        }
        let prev = self
            .list_state
            .selected()
            .map_or(0, |index| index.saturating_sub(1));
        self.list_state.select(Some(prev));
    }

    pub fn select_last(&mut self) {
        let len = self.session.discussion().len();
        self.list_state.select(len.checked_sub(1));
    }

    /// Prompt for a discussion summary, unless one is already running
    pub fn request_discussion_summary(&mut self) -> Option<String> {
        self.session.begin_discussion_summary()
    }

    /// Prompt for the selected comment, unless it is cached or a request is running
    pub fn request_comment_summary(&mut self) -> Option<(CommentId, String)> {
        let id = self.selected_id()?;
        match self.session.begin_comment_summary(id) {
            CommentRequest::Send(prompt) => Some((id, prompt)),
            CommentRequest::Cached | CommentRequest::Busy | CommentRequest::Unknown => None,
        }
    }

    /// Apply a settled discussion summary and show the Summary tab.
    pub fn finish_discussion_summary(&mut self, result: Result<DiscussionSummary, AgentError>) {
        self.session.finish_discussion_summary(result);
        self.tab = Tab::Summary;
    }

    pub fn start_compose(&mut self) {
        self.mode = Mode::Compose;
        self.tab = Tab::Discussion;
        self.hint = None;
    }

    pub fn cancel_compose(&mut self) {
        self.mode = Mode::Normal;
        self.hint = None;
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.field {
            ComposeField::Author => &mut self.draft.author,
            ComposeField::Specialty => &mut self.draft.specialty,
            ComposeField::Text => &mut self.draft.text,
        }
    }

    /// Post the draft. On success the form resets and the new comment is selected.
    pub fn post_draft(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        match self.session.post(draft.clone()) {
            Ok(_) => {
                self.mode = Mode::Normal;
                self.field = ComposeField::default();
                self.hint = None;
                self.select_last();
            }
            Err(error) => {
                self.draft = draft;
                self.hint = Some(error.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::sample_discussion;
    use crate::store::Discussion;

    fn state() -> AppState {
        AppState::new(Session::new(Discussion::with_comments(sample_discussion())))
    }

    #[test]
    fn selection_is_clamped() {
        let mut state = state();
        assert_eq!(state.selected_id(), Some(CommentId(1)));
        state.select_prev();
        assert_eq!(state.selected_id(), Some(CommentId(1)));
        for _ in 0..20 {
            state.select_next();
        }
        assert_eq!(state.selected_id(), Some(CommentId(10)));
    }

    #[test]
    fn empty_discussion_has_no_selection() {
        let mut state = AppState::new(Session::default());
        state.select_next();
        assert_eq!(state.selected_id(), None);
        assert!(state.request_comment_summary().is_none());
    }

    #[test]
    fn posting_selects_new_comment_and_resets_form() {
        let mut state = state();
        state.start_compose();
        state.draft = NewComment::new("Dr. Test", "", "hello");
        state.field = ComposeField::Text;

        state.post_draft();

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.draft, NewComment::default());
        assert_eq!(state.field, ComposeField::Author);
        let id = state.selected_id().unwrap();
        let comment = state.session.discussion().get(id).unwrap();
        assert_eq!(comment.specialty, "Unknown");
    }

    #[test]
    fn rejected_draft_is_kept_with_hint() {
        let mut state = state();
        state.start_compose();
        state.draft = NewComment::new("", "Cardiology", "hello");

        state.post_draft();

        assert_eq!(state.mode, Mode::Compose);
        assert_eq!(state.draft.text, "hello");
        assert_eq!(state.hint.as_deref(), Some("a comment needs an author"));
        assert_eq!(state.session.discussion().len(), 10);
    }

    #[test]
    fn finished_discussion_summary_switches_tab() {
        let mut state = state();
        state.request_discussion_summary().unwrap();
        state.finish_discussion_summary(Ok(DiscussionSummary::default()));
        assert_eq!(state.tab, Tab::Summary);
        assert!(!state.session.is_summarizing_discussion());
    }
}
