//! Route changes requested by the session and the views.

use std::sync::Mutex;

/// Where the client is sent next.
///
/// `push` is an in-app route change that keeps live state; `hard_navigate`
/// is a full reload that discards every view.
pub trait Navigator: Send + Sync + 'static {
    fn push(&self, path: &str);
    fn hard_navigate(&self, path: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Push(String),
    Hard(String),
}

impl Navigation {
    pub fn path(&self) -> &str {
        match self {
            Navigation::Push(p) | Navigation::Hard(p) => p,
        }
    }
}

/// Navigator that only records what was requested.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Navigation> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.lock().last().cloned()
    }

    /// Drain the history.
    pub fn take(&self) -> Vec<Navigation> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Navigation>> {
        self.history.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        tracing::debug!("navigate {path}");
        self.lock().push(Navigation::Push(path.to_string()));
    }

    fn hard_navigate(&self, path: &str) {
        tracing::debug!("hard navigate {path}");
        self.lock().push(Navigation::Hard(path.to_string()));
    }
}
