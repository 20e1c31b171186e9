// [apps/agent/src/errors.rs]
//! Error taxonomy for the binary-level components: bootstrap, the task
//! supervisor, and the control loop. Core crates keep their own leaf
//! error types; these wrap them with the context a runtime failure
//! needs before it's logged or turned into a coordinator report.

use std::path::PathBuf;

use agent_attack_params::ArgBuildError;
use agent_coordinator_client::CoordinatorError;
use agent_cracker_session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("another agent instance is already running (lock held at {0})")]
    AlreadyRunning(PathBuf),

    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write pid lock {path}: {source}")]
    PidLock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures surfaced by `run_task`. Every variant other than
/// `Cancelled` is wrapped context on top of an existing leaf error;
/// the control loop treats all of them as recoverable — it sleeps and
/// continues polling.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("invalid attack parameters: {0}")]
    InvalidAttack(#[from] ArgBuildError),

    #[error("cracker session failure: {0}")]
    Session(#[from] SessionError),

    #[error("coordinator call failed: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("failed to provision attack files: {0}")]
    FileProvisioning(String),

    #[error("task execution was cancelled")]
    Cancelled,
}
