// [libs/infra/coordinator-client/src/types.rs]
//! Wire payloads exchanged with the coordinator that aren't already
//! covered by the shared domain models.

use serde::{Deserialize, Serialize};

use agent_domain_models::ServerState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentAuthResponse {
    pub agent_id: String,
}

/// Server-advertised knobs refreshed on startup and on every `reload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAgentConfig {
    pub agent_update_interval_secs: u64,
    pub use_native_cracker: bool,
    #[serde(default)]
    pub benchmark_update_frequency_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub state: ServerState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Info,
    Minor,
    Critical,
    Fatal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentErrorReport<'a> {
    pub message: &'a str,
    pub task_id: Option<&'a str>,
    pub severity: ErrorSeverity,
}
