use async_trait::async_trait;
use clinicalthread::{AgentError, Completion};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned reply handed out by [`ScriptedBackend`].
pub enum Reply {
    Text(&'static str),
    Unreachable,
}

/// Backend that replays scripted replies and counts calls.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedBackend {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text.to_string()),
            Some(Reply::Unreachable) => Err(AgentError::Transport("connection refused".to_string())),
            None => panic!("backend called more often than scripted"),
        }
    }
}
