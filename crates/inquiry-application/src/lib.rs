//! Application layer of the research workflow.
//!
//! [`WorkflowController`] owns the current research session and drives the
//! view state machine; [`PersistenceQueue`] writes its snapshots in order on
//! a background task.

pub mod persistence;
pub mod workflow;

pub use persistence::PersistenceQueue;
pub use workflow::{Collaborators, Outcome, RequestTicket, WorkflowController};
