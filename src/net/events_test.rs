use std::sync::Mutex;

use super::*;

fn unauthorized() -> AuthEvent {
    AuthEvent::Unauthorized { path: "/auth/users/me".into() }
}

#[test]
fn emit_without_listeners_is_noop() {
    AuthEvents::new().emit(&unauthorized());
}

#[test]
fn listeners_run_in_subscription_order() {
    let events = AuthEvents::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for tag in ["session", "router"] {
        let seen = Arc::clone(&seen);
        events.subscribe(move |_| seen.lock().unwrap().push(tag));
    }

    events.emit(&unauthorized());
    assert_eq!(*seen.lock().unwrap(), vec!["session", "router"]);
}

#[test]
fn clones_share_listeners() {
    let events = AuthEvents::new();
    let clone = events.clone();
    let hits = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&hits);
    clone.subscribe(move |_| *counter.lock().unwrap() += 1);

    events.emit(&unauthorized());
    events.emit(&unauthorized());
    assert_eq!(*hits.lock().unwrap(), 2);
}

#[test]
fn listener_may_subscribe_during_emit() {
    let events = AuthEvents::new();
    let inner = events.clone();
    events.subscribe(move |_| inner.subscribe(|_| {}));

    events.emit(&unauthorized());
    assert_eq!(events.listener_count(), 2);
}

#[test]
fn debug_reports_listener_count() {
    let events = AuthEvents::new();
    events.subscribe(|_| {});
    assert!(format!("{events:?}").contains("listeners: 1"));
}

// =============================================================================
// owner-scoped listeners
// =============================================================================

#[test]
fn weak_listener_runs_while_owner_lives() {
    let events = AuthEvents::new();
    let owner = Arc::new(Mutex::new(Vec::new()));
    events.subscribe_weak(&owner, |owner, event| owner.lock().unwrap().push(event.clone()));

    events.emit(&unauthorized());
    assert_eq!(*owner.lock().unwrap(), vec![unauthorized()]);
    assert_eq!(events.listener_count(), 1);
}

#[test]
fn weak_listener_is_dropped_after_owner() {
    let events = AuthEvents::new();
    let owner = Arc::new(Mutex::new(0));
    events.subscribe_weak(&owner, |owner, _| *owner.lock().unwrap() += 1);
    events.subscribe(|_| {});
    drop(owner);

    events.emit(&unauthorized());
    assert_eq!(events.listener_count(), 1);
}

#[test]
fn pruning_keeps_order_of_live_listeners() {
    let events = AuthEvents::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let gone = Arc::new(());

    let first = Arc::clone(&seen);
    events.subscribe(move |_| first.lock().unwrap().push("first"));
    events.subscribe_weak(&gone, |_, _| {});
    let last = Arc::clone(&seen);
    events.subscribe(move |_| last.lock().unwrap().push("last"));
    drop(gone);

    events.emit(&unauthorized());
    events.emit(&unauthorized());
    assert_eq!(*seen.lock().unwrap(), vec!["first", "last", "first", "last"]);
    assert_eq!(events.listener_count(), 2);
}
