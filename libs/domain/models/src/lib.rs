// [libs/domain/models/src/lib.rs]
//! Shared DTOs and domain entities for the cracking-fleet worker agent.
//!
//! No I/O lives here — only the types that cross crate boundaries:
//! attack parameters, task records, configuration, and the wire
//! shapes for status/crack/heartbeat traffic.

pub mod attack;
pub mod config;
pub mod crack;
pub mod server;
pub mod status;
pub mod task;

pub use attack::{AttackDescriptor, AttackMode, AttackParams, CustomCharsets, MaskIncrement};
pub use config::AgentConfig;
pub use crack::CrackResult;
pub use server::ServerState;
pub use status::{CrackerStatus, DeviceStatus, GuessInfo};
pub use task::{Activity, ProgressCursor, Task, TaskStats};
