// [libs/infra/coordinator-client/src/api.rs]
//! The typed interface the agent's core depends on. C4/C5 are written
//! against this trait; only the HTTP implementation knows about
//! `reqwest`, status codes, or retry policy.

use async_trait::async_trait;

use agent_domain_models::{AttackDescriptor, CrackResult, CrackerStatus, Task};

use crate::errors::CoordinatorError;
use crate::types::{AgentErrorReport, ErrorSeverity, RemoteAgentConfig};

#[async_trait]
pub trait CoordinatorApi: Send + Sync {
    async fn authenticate(&self) -> Result<String, CoordinatorError>;
    async fn get_agent_configuration(&self) -> Result<RemoteAgentConfig, CoordinatorError>;
    async fn get_new_task(&self) -> Result<Option<Task>, CoordinatorError>;
    async fn accept_task(&self, task: &Task) -> Result<(), CoordinatorError>;
    async fn abandon_task(&self, task: &Task) -> Result<(), CoordinatorError>;
    async fn get_attack_parameters(
        &self,
        attack_id: &str,
    ) -> Result<AttackDescriptor, CoordinatorError>;
    async fn submit_status(
        &self,
        task: &Task,
        status: &CrackerStatus,
    ) -> Result<(), CoordinatorError>;
    async fn submit_crack(&self, task: &Task, result: &CrackResult) -> Result<(), CoordinatorError>;
    async fn submit_agent_error(
        &self,
        message: &str,
        task: Option<&Task>,
        severity: ErrorSeverity,
    ) -> Result<(), CoordinatorError>;
    async fn report_exhausted(&self, task: &Task) -> Result<(), CoordinatorError>;
    async fn send_heartbeat(&self) -> Result<agent_domain_models::ServerState, CoordinatorError>;
    async fn send_shutdown(&self) -> Result<(), CoordinatorError>;
}

/// Convenience so call sites don't have to build an `AgentErrorReport`
/// by hand for the common case.
pub(crate) fn error_report<'a>(
    message: &'a str,
    task_id: Option<&'a str>,
    severity: ErrorSeverity,
) -> AgentErrorReport<'a> {
    AgentErrorReport {
        message,
        task_id,
        severity,
    }
}
