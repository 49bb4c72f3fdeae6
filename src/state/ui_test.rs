use super::*;

// =============================================================
// UiState defaults
// =============================================================

#[test]
fn ui_state_default_no_prompt() {
    let state = UiState::default();
    assert!(!state.login_prompt);
    assert!(state.notice.is_none());
}

#[test]
fn ui_store_starts_at_default() {
    assert_eq!(UiStore::new().snapshot(), UiState::default());
}

// =============================================================
// Login prompt
// =============================================================

#[test]
fn request_login_sets_prompt_and_notice() {
    let ui = UiStore::new();
    ui.request_login("Please log in.");
    let state = ui.snapshot();
    assert!(state.login_prompt);
    assert_eq!(state.notice.as_deref(), Some("Please log in."));
}

#[test]
fn dismiss_login_keeps_notice() {
    let ui = UiStore::new();
    ui.request_login("Please log in.");
    ui.dismiss_login();
    let state = ui.snapshot();
    assert!(!state.login_prompt);
    assert!(state.notice.is_some());
}

#[test]
fn dismiss_without_prompt_does_not_notify() {
    let ui = UiStore::new();
    let rx = ui.subscribe();
    ui.dismiss_login();
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn take_notice_is_one_shot() {
    let ui = UiStore::new();
    ui.request_login("Please log in.");
    assert_eq!(ui.take_notice().as_deref(), Some("Please log in."));
    assert_eq!(ui.take_notice(), None);
}

#[test]
fn clones_share_state() {
    let ui = UiStore::new();
    let clone = ui.clone();
    clone.request_login("x");
    assert!(ui.snapshot().login_prompt);
}
