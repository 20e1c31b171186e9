// [libs/infra/cracker-session/src/events.rs]
//! The polymorphic session event: all four output streams of a running
//! cracker process collapse into one tagged channel, so the supervisor
//! selects over a single receiver instead of four.

use agent_domain_models::{CrackResult, CrackerStatus};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Crack(CrackResult),
    Status(Box<CrackerStatus>),
    Stderr(String),
    Stdout { text: String, is_info: bool },
}

/// The terminal outcome of a session: the child's exit status, or the
/// reason it could not be waited on.
#[derive(Debug, Clone)]
pub enum SessionDone {
    Exited(std::process::ExitStatus),
    WaitFailed(String),
}
