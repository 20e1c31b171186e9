// [apps/agent/src/control_loop.rs]
//! The agent's main loop (C5): polls for work, drives one task at a
//! time through the supervisor, and runs a heartbeat worker alongside
//! it that reacts to server-pushed state changes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use agent_coordinator_client::CoordinatorApi;
use agent_domain_models::{Activity, ServerState};

use crate::collaborators::{CrackerUpdater, FileProvisioner};
use crate::context::AgentContext;
use crate::supervisor;

const STOPPED_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub struct AgentLoop {
    context: Arc<AgentContext>,
    coordinator: Arc<dyn CoordinatorApi>,
    binary_path: PathBuf,
    provisioner: Arc<dyn FileProvisioner>,
    updater: Arc<dyn CrackerUpdater>,
}

impl AgentLoop {
    pub fn new(
        context: Arc<AgentContext>,
        coordinator: Arc<dyn CoordinatorApi>,
        binary_path: PathBuf,
        provisioner: Arc<dyn FileProvisioner>,
        updater: Arc<dyn CrackerUpdater>,
    ) -> Self {
        Self {
            context,
            coordinator,
            binary_path,
            provisioner,
            updater,
        }
    }

    /// Runs until `terminate` reports `true`. Each iteration does at
    /// most one of: reload (which always ends in a fresh benchmark),
    /// one task, or one time-triggered benchmark — never more than one
    /// blocking operation per pass, so a termination signal is never
    /// starved for long.
    pub async fn run(&self, mut terminate: watch::Receiver<bool>) {
        self.context.set_activity(Activity::Starting);

        loop {
            if *terminate.borrow() {
                break;
            }

            if self.context.take_reload() {
                self.reload().await;
                continue;
            }

            if self.context.job_checking_stopped() {
                self.context.set_activity(Activity::Stopping);
                tokio::select! {
                    _ = tokio::time::sleep(STOPPED_POLL_INTERVAL) => {}
                    _ = terminate.changed() => {}
                }
                continue;
            }

            match self.coordinator.get_new_task().await {
                Ok(Some(task)) => {
                    self.run_one_task(task, terminate.clone()).await;
                }
                Ok(None) => {
                    if self.context.benchmark_due() {
                        self.run_scheduled_benchmark().await;
                    } else {
                        self.context.set_activity(Activity::Waiting);
                        tokio::select! {
                            _ = tokio::time::sleep(self.context.config().agent_update_interval()) => {}
                            _ = terminate.changed() => {}
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to poll for a new task");
                    tokio::select! {
                        _ = tokio::time::sleep(self.context.config().agent_update_interval()) => {}
                        _ = terminate.changed() => {}
                    }
                }
            }
        }

        let _ = self.coordinator.send_shutdown().await;
    }

    async fn reload(&self) {
        self.context.set_activity(Activity::Updating);
        match self.coordinator.get_agent_configuration().await {
            Ok(remote) => self.context.merge_remote_config(remote),
            Err(error) => tracing::warn!(%error, "failed to refresh agent configuration"),
        }

        if !self.context.config().use_native_cracker {
            if let Err(error) = self.updater.update().await {
                tracing::warn!(%error, "failed to update cracker binary");
            }
        }

        self.run_scheduled_benchmark().await;
    }

    async fn run_one_task(&self, task: agent_domain_models::Task, cancel: watch::Receiver<bool>) {
        let attack = match self.coordinator.get_attack_parameters(&task.attack_id).await {
            Ok(attack) => attack,
            Err(error) => {
                tracing::error!(%error, task_id = %task.id, "failed to fetch attack parameters");
                let _ = self.coordinator.abandon_task(&task).await;
                return;
            }
        };

        self.context.set_activity(Activity::Cracking);
        let config = self.context.config();

        let result = supervisor::run_task(
            self.coordinator.as_ref(),
            self.provisioner.as_ref(),
            &config,
            &self.binary_path,
            task,
            attack,
            cancel,
        )
        .await;

        self.context.set_activity(Activity::Waiting);

        match result {
            Ok(outcome) => tracing::info!(?outcome, "task finished"),
            Err(error) => {
                tracing::error!(%error, "task supervisor returned an error");
                tokio::time::sleep(config.sleep_on_failure()).await;
            }
        }
    }

    async fn run_scheduled_benchmark(&self) {
        self.context.set_activity(Activity::Benchmarking);
        let config = self.context.config();

        if let Err(error) = supervisor::run_benchmark(&config, &self.binary_path).await {
            tracing::warn!(%error, "scheduled benchmark failed");
        }

        self.context.mark_benchmarked();
        self.context.set_activity(Activity::Waiting);
    }
}

/// Polls `send_heartbeat` on `heartbeat_interval` and translates the
/// server's reported state into the agent-wide flags the control loop
/// reads: `pending` requests a reload, `stopped` halts job checking,
/// and `error` forces a full shutdown.
pub fn spawn_heartbeat_worker(
    context: Arc<AgentContext>,
    coordinator: Arc<dyn CoordinatorApi>,
    terminate: watch::Sender<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let interval = context.config().heartbeat_interval();
            tokio::time::sleep(interval).await;

            if *terminate.borrow() {
                break;
            }

            match coordinator.send_heartbeat().await {
                Ok(ServerState::Active) => {}
                Ok(ServerState::Pending) => context.request_reload_unless_benchmarking(),
                Ok(ServerState::Stopped) => context.stop_job_checking(),
                Ok(ServerState::Error) => {
                    tracing::error!("coordinator reported an error state, shutting down");
                    let _ = terminate.send(true);
                    break;
                }
                Err(error) => tracing::warn!(%error, "heartbeat failed"),
            }
        }
    })
}
