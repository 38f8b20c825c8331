//! Event bus for the TUI.
//!
//! Terminal input, timer ticks, and settled summarization requests all arrive
//! on one tokio unbounded channel as [`AppEvent`]s.

use crate::agent::AgentError;
use crate::discussion::{CommentId, CommentSummary, DiscussionSummary};
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

#[derive(Debug)]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only)
    Key(KeyEvent),
    Resize(u16, u16),
    /// Spinner tick (250 ms)
    Tick,
    /// Redraw (≈30 FPS)
    Render,
    DiscussionSummarized(Result<DiscussionSummary, AgentError>),
    CommentSummarized {
        id: CommentId,
        result: Result<CommentSummary, AgentError>,
    },
}

pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the task feeding terminal input and timer ticks into `tx`.
///
/// Exits once the receiver is dropped.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick = tick_interval.tick();
            let render = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick => tx.send(AppEvent::Tick),
                _ = render => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
