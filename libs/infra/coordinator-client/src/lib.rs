// [libs/infra/coordinator-client/src/lib.rs]
//! The typed coordinator interface the core depends on (`CoordinatorApi`)
//! plus its `reqwest` implementation with retry/backoff.

mod api;
mod client;
mod errors;
mod types;

pub use api::CoordinatorApi;
pub use client::ReqwestCoordinatorClient;
pub use errors::CoordinatorError;
pub use types::{AgentAuthResponse, ErrorSeverity, HeartbeatResponse, RemoteAgentConfig};
