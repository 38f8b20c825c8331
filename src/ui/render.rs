//! Frame rendering.
//!
//! `render` is the only function called from `terminal.draw()`.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{AppState, ComposeField, Mode, Tab};
use super::theme::{specialty_color, ACCENT, ERROR, MUTED, TLDR_FG};
use crate::discussion::{Comment, DiscussionSummary};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Height of the compose form, borders included
const COMPOSE_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let compose_height = if state.mode == Mode::Compose {
        COMPOSE_HEIGHT
    } else {
        0
    };
    let [header, tabs, body, compose, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(compose_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, state);
    render_tabs(frame, tabs, state);
    match state.tab {
        Tab::Discussion => render_discussion(frame, body, state),
        Tab::Summary => render_summary(frame, body, state),
    }
    if compose_height > 0 {
        render_compose(frame, compose, state);
    }
    render_status(frame, status, state);
}

fn spinner(state: &AppState) -> char {
    SPINNER[state.tick % SPINNER.len()]
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let discussion = state.session.discussion();
    let lines = vec![
        Line::from(vec![
            Span::styled("⚕ ClinicalThread", Style::new().add_modifier(Modifier::BOLD)),
            Span::styled("  AI-Powered Discussion Intelligence", Style::new().fg(MUTED)),
        ]),
        Line::from(vec![
            Span::raw(format!("{} replies", discussion.len())),
            Span::styled(" · ", Style::new().fg(MUTED)),
            Span::raw(format!("{} physicians", discussion.participants())),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState) {
    let summary_title = if state.session.discussion().discussion_summary().is_some() {
        "AI Summary ✓"
    } else {
        "AI Summary"
    };
    let selected: usize = match state.tab {
        Tab::Discussion => 0,
        Tab::Summary => 1,
    };
    let tabs = Tabs::new(vec![Line::from("Discussion"), Line::from(summary_title)])
        .select(selected)
        .style(Style::new().fg(MUTED))
        .highlight_style(Style::new().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn comment_item(comment: &Comment, state: &AppState, width: usize) -> ListItem<'static> {
    let color = specialty_color(&comment.specialty);
    let loading = state.session.summarizing_comment() == Some(comment.id);
    let summary = state.session.discussion().comment_summary(comment.id);

    let badge = if loading {
        format!("{} ...", spinner(state))
    } else if summary.is_some() {
        "✓ TL;DR".to_string()
    } else {
        "TL;DR".to_string()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("({}) ", comment.initial()),
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(comment.author.clone(), Style::new().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(comment.specialty.to_uppercase(), Style::new().fg(color)),
        Span::styled(format!("  {}  ", comment.time), Style::new().fg(MUTED)),
        Span::styled(badge, Style::new().fg(ACCENT)),
    ])];

    lines.extend(wrap(&comment.text, width).into_iter().map(Line::from));

    if let Some(summary) = summary.filter(|s| !s.key_point.trim().is_empty()) {
        lines.push(Line::styled(
            "  AI SUMMARY",
            Style::new().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        lines.extend(
            wrap(&summary.key_point, width.saturating_sub(2))
                .into_iter()
                .map(|line| Line::styled(format!("  {line}"), Style::new().fg(ACCENT))),
        );
    }
    lines.push(Line::default());

    ListItem::new(Text::from(lines))
}

fn render_discussion(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let title = if state.session.is_summarizing_discussion() {
        format!(" Thread · {} summarizing… ", spinner(state))
    } else {
        " Thread · s summarize discussion · t TL;DR · a add ".to_string()
    };
    let block = Block::bordered().title(title);
    // borders plus the highlight symbol
    let width = usize::from(area.width.saturating_sub(4));

    let items: Vec<ListItem> = state
        .session
        .discussion()
        .comments()
        .iter()
        .map(|comment| comment_item(comment, state, width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌ ")
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_summary(frame: &mut Frame, area: Rect, state: &AppState) {
    let loading = state.session.is_summarizing_discussion();
    match state.session.discussion().discussion_summary() {
        Some(summary) => render_digest(frame, area, summary, loading, spinner(state)),
        None => {
            let action = if loading {
                format!("{} Generating...", spinner(state))
            } else {
                "Press s to generate a summary".to_string()
            };
            let text = Text::from(vec![
                Line::default(),
                Line::styled("✦", Style::new().fg(MUTED)),
                Line::styled("No summary yet", Style::new().add_modifier(Modifier::BOLD)),
                Line::styled(
                    "Generate an AI summary of the full discussion to quickly grasp the clinical consensus.",
                    Style::new().fg(MUTED),
                ),
                Line::default(),
                Line::styled(action, Style::new().fg(ACCENT)),
            ]);
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::bordered());
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_digest(
    frame: &mut Frame,
    area: Rect,
    summary: &DiscussionSummary,
    loading: bool,
    spin: char,
) {
    let tldr_lines = wrap(&summary.tldr, usize::from(area.width.saturating_sub(2)));
    let tldr_height = u16::try_from(tldr_lines.len()).unwrap_or(u16::MAX).saturating_add(2);

    let [tldr, columns, insights, footer] = Layout::vertical([
        Constraint::Length(tldr_height),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let tldr_text: Vec<Line> = tldr_lines
        .into_iter()
        .map(|line| Line::styled(line, Style::new().add_modifier(Modifier::ITALIC)))
        .collect();
    frame.render_widget(
        Paragraph::new(tldr_text).block(
            Block::bordered()
                .title(" TL;DR — 30-second read ")
                .border_style(Style::new().fg(TLDR_FG)),
        ),
        tldr,
    );

    let [consensus, actions] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(columns);

    let consensus_lines: Vec<Line> = summary
        .consensus
        .iter()
        .map(|point| {
            Line::from(vec![
                Span::styled("✓ ", Style::new().fg(ACCENT)),
                Span::raw(point.clone()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(consensus_lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" ◉ Consensus Points ")),
        consensus,
    );

    let action_lines: Vec<Line> = summary
        .action_items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Line::from(vec![
                Span::styled(format!("{}. ", index + 1), Style::new().fg(ACCENT)),
                Span::raw(item.clone()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(action_lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" ▶ Action Items ")),
        actions,
    );

    let insight_lines: Vec<Line> = summary
        .key_insights
        .iter()
        .map(|insight| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", insight.author),
                    Style::new().add_modifier(Modifier::BOLD),
                ),
                Span::raw(insight.insight.clone()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(insight_lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" ◆ Notable Expert Opinions ")),
        insights,
    );

    let footer_text = if loading {
        format!("{spin} Regenerating...")
    } else {
        "s ↺ Regenerate".to_string()
    };
    frame.render_widget(
        Paragraph::new(Line::styled(footer_text, Style::new().fg(MUTED))),
        footer,
    );
}

fn render_compose(frame: &mut Frame, area: Rect, state: &AppState) {
    let field_line = |label: &str, value: &str, field: ComposeField| {
        let focused = state.field == field;
        let marker = if focused { "› " } else { "  " };
        let cursor = if focused { "▏" } else { "" };
        let label_style = if focused {
            Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(MUTED)
        };
        Line::from(vec![
            Span::styled(format!("{marker}{label}: "), label_style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let text = vec![
        field_line("Your name", &state.draft.author, ComposeField::Author),
        field_line("Specialty", &state.draft.specialty, ComposeField::Specialty),
        field_line("Comment", &state.draft.text, ComposeField::Text),
    ];
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(
            Block::bordered()
                .title(" Add to Discussion · Tab next field · Enter post · Esc cancel ")
                .border_style(Style::new().fg(ACCENT)),
        ),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(notice) = state.session.notice() {
        Line::styled(
            format!("{}: {}  (x to dismiss)", notice.headline(), notice.detail),
            Style::new().fg(ERROR),
        )
    } else if let Some(hint) = &state.hint {
        Line::styled(hint.clone(), Style::new().fg(ERROR))
    } else {
        let help = match state.mode {
            Mode::Normal => "q quit · Tab switch tab · j/k select · s summarize · t TL;DR · a add comment",
            Mode::Compose => "COMPOSE · Tab next field · Enter post · Esc cancel",
        };
        Line::styled(help, Style::new().fg(MUTED))
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::{sample_discussion, CommentId, CommentSummary};
    use crate::session::Session;
    use crate::store::Discussion;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn state() -> AppState {
        AppState::new(Session::new(Discussion::with_comments(sample_discussion())))
    }

    fn draw(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        assert_eq!(
            wrap("rhythm control with ablation", 12),
            vec!["rhythm", "control with", "ablation"]
        );
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn discussion_tab_shows_comments_and_cached_key_point() {
        let mut state = state();
        state.session.begin_comment_summary(CommentId(1));
        state.session.finish_comment_summary(
            CommentId(1),
            Ok(CommentSummary {
                summary: "s".to_string(),
                key_point: "Rate vs rhythm".to_string(),
            }),
        );

        let screen = draw(&mut state);
        assert!(screen.contains("Dr. Sarah Chen"));
        assert!(screen.contains("10 replies"));
        assert!(screen.contains("Rate vs rhythm"));
    }

    #[test]
    fn summary_tab_without_summary_shows_empty_state() {
        let mut state = state();
        state.tab = Tab::Summary;
        let screen = draw(&mut state);
        assert!(screen.contains("No summary yet"));
    }

    #[test]
    fn summary_tab_tolerates_missing_sections() {
        let mut state = state();
        state.tab = Tab::Summary;
        state.session.begin_discussion_summary();
        state.session.finish_discussion_summary(Ok(DiscussionSummary {
            tldr: "Cardiovert then ablate".to_string(),
            ..DiscussionSummary::default()
        }));

        let screen = draw(&mut state);
        assert!(screen.contains("Cardiovert then ablate"));
        assert!(screen.contains("Consensus Points"));
        assert!(screen.contains("AI Summary ✓"));
    }
}
