//! # matchday-core
//!
//! Pure logic for the Matchday client (no I/O, instant tests).
//!
//! This crate implements the state machines and cache projections used by
//! the client without any network access, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (remote API, cache writes) is performed by `matchday-client`,
//! which interprets the transitions and actions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod friendship;
pub mod projection;
pub mod refresh;

pub use friendship::{available_actions, ActionError, FriendAction, Transition, TransitionKind};
pub use projection::{project_user_detail, remove_request, without_request};
pub use refresh::{RefreshAction, RefreshConfig, RefreshEvent, RefreshState};
