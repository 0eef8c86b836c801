//! The Maitred agent: orchestration loop, persona prompt, session state.
//!
//! [`AgentLoop`] runs one guest turn — reason, execute requested
//! operations, fold results back in, reason again — until the model
//! produces a final reply. [`Concierge`] wraps the loop with per-thread
//! conversation state so a guest can carry context across turns.

pub mod loop_runner;
pub mod prompt;
pub mod session;

pub use loop_runner::AgentLoop;
pub use session::{Concierge, SessionStore};
