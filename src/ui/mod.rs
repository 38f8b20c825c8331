//! TUI module using ratatui.
//!
//! One event loop owns [`AppState`]. Summarization requests run on spawned
//! tasks and report back through the event channel, so the loop never waits
//! on the network.

pub mod app;
pub mod event;
pub mod keys;
pub mod render;
pub mod terminal;
pub mod theme;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::agent::{self, AgentError, AnthropicClient, Completion};
use crate::config::{Config, ConfigError};
use crate::discussion::{sample_discussion, CommentSummary};
use crate::session::Session;
use crate::store::Discussion;
use app::AppState;
use event::{AppEvent, EventHandler};
use keys::KeyAction;

/// Backend shared with request tasks; `None` when no credential is configured.
type Backend = Option<Arc<dyn Completion>>;

/// Run the TUI over the sample discussion until the user quits.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let backend: Backend = match AnthropicClient::new(config) {
        Ok(client) => Some(Arc::new(client)),
        Err(error) => {
            warn!(error = %error, "summaries unavailable");
            None
        }
    };
    let mut state = AppState::new(Session::new(Discussion::with_comments(
        sample_discussion(),
    )));

    terminal::install_panic_hook();
    let mut tui = terminal::init()?;

    let handler = EventHandler::new();
    event::spawn_event_task(handler.tx.clone());

    let result = event_loop(&mut tui, &mut state, &backend, handler).await;

    terminal::restore()?;
    info!("tui closed");
    result
}

async fn event_loop(
    tui: &mut terminal::Tui,
    state: &mut AppState,
    backend: &Backend,
    handler: EventHandler,
) -> anyhow::Result<()> {
    let EventHandler { tx, mut rx } = handler;

    while let Some(event) = rx.recv().await {
        match event {
            AppEvent::Render => {
                tui.draw(|frame| render::render(frame, state))?;
            }
            AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
            AppEvent::Resize(_, _) => {}
            AppEvent::Key(key) => match keys::handle_key(key, state) {
                KeyAction::Quit => break,
                KeyAction::Continue => {}
                KeyAction::SummarizeDiscussion(prompt) => {
                    spawn_request(
                        backend.clone(),
                        prompt,
                        tx.clone(),
                        AppEvent::DiscussionSummarized,
                    );
                }
                KeyAction::SummarizeComment(id, prompt) => {
                    let wrap = move |result: Result<CommentSummary, AgentError>| {
                        AppEvent::CommentSummarized { id, result }
                    };
                    spawn_request(backend.clone(), prompt, tx.clone(), wrap);
                }
            },
            AppEvent::DiscussionSummarized(result) => state.finish_discussion_summary(result),
            AppEvent::CommentSummarized { id, result } => {
                state.session.finish_comment_summary(id, result)
            }
        }
    }
    Ok(())
}

/// Run one request on a background task and post its result as an event.
fn spawn_request<T, F>(backend: Backend, prompt: String, tx: UnboundedSender<AppEvent>, wrap: F)
where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(Result<T, AgentError>) -> AppEvent + Send + 'static,
{
    tokio::spawn(async move {
        let result = match backend {
            Some(backend) => agent::request(backend.as_ref(), &prompt).await,
            None => Err(AgentError::Config(ConfigError::MissingApiKey)),
        };
        let _ = tx.send(wrap(result));
    });
}
