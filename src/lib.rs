//! # livria
//!
//! Client-side session layer for the Livria book-library application.
//!
//! This crate contains the REST API client, the session store mirrored into
//! persistent key/value storage, shared UI state, and the static route table
//! with its navigation guard. Local storage sits behind a small trait and
//! navigation history is modeled in-process, so the policy layer runs
//! natively.

pub mod app;
pub mod config;
pub mod error;
pub mod net;
pub mod router;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testutil;
