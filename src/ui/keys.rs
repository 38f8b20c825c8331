//! Key dispatcher.
//!
//! Translates key presses into [`AppState`] mutations and tells the event loop
//! whether to quit or start a summarization request.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{AppState, Mode, Tab};
use crate::discussion::CommentId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Send this discussion prompt
    SummarizeDiscussion(String),
    /// Send this prompt for one comment
    SummarizeComment(CommentId, String),
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::Normal => handle_normal(key, state),
        Mode::Compose => handle_compose(key, state),
    }
}

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
        KeyCode::Tab | KeyCode::BackTab => state.tab = state.tab.toggle(),
        KeyCode::Char('1') => state.tab = Tab::Discussion,
        KeyCode::Char('2') => state.tab = Tab::Summary,
        KeyCode::Char('j') | KeyCode::Down => state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.select_prev(),
        KeyCode::Char('G') | KeyCode::End => state.select_last(),
        KeyCode::Char('s') | KeyCode::Char('r') => {
            if let Some(prompt) = state.request_discussion_summary() {
                return KeyAction::SummarizeDiscussion(prompt);
            }
        }
        KeyCode::Char('t') | KeyCode::Enter if state.tab == Tab::Discussion => {
            if let Some((id, prompt)) = state.request_comment_summary() {
                return KeyAction::SummarizeComment(id, prompt);
            }
        }
        KeyCode::Char('a') => state.start_compose(),
        KeyCode::Char('x') | KeyCode::Esc => state.session.dismiss_notice(),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_compose(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.cancel_compose(),
        KeyCode::Tab => state.field = state.field.next(),
        KeyCode::BackTab => state.field = state.field.prev(),
        KeyCode::Enter => state.post_draft(),
        KeyCode::Backspace => {
            state.field_mut().pop();
        }
        KeyCode::Char(c) => state.field_mut().push(c),
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::sample_discussion;
    use crate::session::Session;
    use crate::store::Discussion;
    use crate::ui::app::ComposeField;

    fn state() -> AppState {
        AppState::new(Session::new(Discussion::with_comments(sample_discussion())))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(press(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut state = state();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c, &mut state), KeyAction::Quit);
    }

    #[test]
    fn summarize_discussion_only_once_while_in_flight() {
        let mut state = state();
        let first = handle_key(press(KeyCode::Char('s')), &mut state);
        assert!(matches!(first, KeyAction::SummarizeDiscussion(_)));
        let second = handle_key(press(KeyCode::Char('s')), &mut state);
        assert_eq!(second, KeyAction::Continue);
    }

    #[test]
    fn tldr_targets_selected_comment() {
        let mut state = state();
        handle_key(press(KeyCode::Char('j')), &mut state);
        match handle_key(press(KeyCode::Char('t')), &mut state) {
            KeyAction::SummarizeComment(id, prompt) => {
                assert_eq!(id, CommentId(2));
                assert!(prompt.contains("Dr. James Okafor (Electrophysiology)"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn tldr_is_ignored_on_summary_tab() {
        let mut state = state();
        handle_key(press(KeyCode::Tab), &mut state);
        assert_eq!(state.tab, Tab::Summary);
        assert_eq!(handle_key(press(KeyCode::Char('t')), &mut state), KeyAction::Continue);
    }

    #[test]
    fn compose_types_into_focused_field_and_posts() {
        let mut state = state();
        handle_key(press(KeyCode::Char('a')), &mut state);
        assert_eq!(state.mode, Mode::Compose);

        type_str(&mut state, "Dr. Test");
        handle_key(press(KeyCode::Tab), &mut state);
        handle_key(press(KeyCode::Tab), &mut state);
        assert_eq!(state.field, ComposeField::Text);
        type_str(&mut state, "hellp");
        handle_key(press(KeyCode::Backspace), &mut state);
        type_str(&mut state, "o");
        // 'q' is text while composing
        type_str(&mut state, " q");

        assert_eq!(handle_key(press(KeyCode::Enter), &mut state), KeyAction::Continue);

        assert_eq!(state.mode, Mode::Normal);
        let last = state.session.discussion().comments().last().unwrap();
        assert_eq!(last.author, "Dr. Test");
        assert_eq!(last.specialty, "Unknown");
        assert_eq!(last.text, "hello q");
    }

    #[test]
    fn escape_cancels_compose_without_posting() {
        let mut state = state();
        handle_key(press(KeyCode::Char('a')), &mut state);
        type_str(&mut state, "Dr. Test");
        handle_key(press(KeyCode::Esc), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.session.discussion().len(), 10);
    }
}
