//! Navigation guard.
//!
//! The guard is a pure function of the target route and whether a session
//! is authenticated. It never touches the network; the router reads the
//! session synchronously and passes the flag in.

use super::table::{names, RouteMatch};

/// Notice shown on the landing view after a protected route was denied.
pub const LOGIN_REQUIRED_NOTICE: &str = "Please log in to continue.";

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The target requires a session and none is active.
    LoginRequired,
    /// The landing view is not shown to a logged-in session.
    AlreadyAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect { to: &'static str, reason: RedirectReason },
}

/// Decide whether navigation to `target` may proceed.
#[must_use]
pub fn evaluate(target: &RouteMatch, authenticated: bool) -> GuardDecision {
    if target.requires_auth && !authenticated {
        return GuardDecision::Redirect { to: names::LANDING, reason: RedirectReason::LoginRequired };
    }
    if target.name == Some(names::LANDING) && authenticated {
        return GuardDecision::Redirect { to: names::MAIN, reason: RedirectReason::AlreadyAuthenticated };
    }
    GuardDecision::Proceed
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
