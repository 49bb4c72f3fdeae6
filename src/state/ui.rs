#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::sync::Arc;

use tokio::sync::watch;

/// Cross-view UI state the session layer drives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// The landing view should open its login form.
    pub login_prompt: bool,
    /// One-shot message for the user, e.g. why a navigation was redirected.
    pub notice: Option<String>,
}

/// Shared handle to [`UiState`].
#[derive(Clone, Debug)]
pub struct UiStore {
    state: Arc<watch::Sender<UiState>>,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self { state: Arc::new(state) }
    }

    #[must_use]
    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Ask the landing view to show the login form with `notice`.
    pub fn request_login(&self, notice: impl Into<String>) {
        let notice = notice.into();
        self.state.send_modify(|s| {
            s.login_prompt = true;
            s.notice = Some(notice);
        });
    }

    pub fn dismiss_login(&self) {
        self.state.send_if_modified(|s| {
            let changed = s.login_prompt;
            s.login_prompt = false;
            changed
        });
    }

    /// Take the pending notice, if any, clearing it.
    pub fn take_notice(&self) -> Option<String> {
        let mut taken = None;
        self.state.send_if_modified(|s| {
            taken = s.notice.take();
            taken.is_some()
        });
        taken
    }
}
