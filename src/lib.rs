//! # ClinicalThread
//!
//! A TUI for reading a clinical discussion thread and summarizing it with an LLM.
//!
//! ## Features
//!
//! - **Structured digests**: whole-thread summaries (TL;DR, consensus, expert
//!   opinions, action items) and per-comment key points as typed structs
//! - **Session store**: ordered comments with a first-write-wins per-comment cache
//! - **Tagged failures**: transport and parse errors stay distinguishable up to the UI

pub mod agent;
pub mod config;
pub mod discussion;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod store;
pub mod ui;

pub use agent::{AgentError, AnthropicClient, Completion, FailureKind};
pub use config::Config;
pub use discussion::{Comment, CommentId, CommentSummary, DiscussionSummary, NewComment};
pub use session::Session;
pub use store::Discussion;
