// [libs/infra/cracker-session/src/errors.rs]
use agent_attack_params::ArgBuildError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to build cracker argv: {0}")]
    ArgBuild(#[from] ArgBuildError),

    #[error("failed to create scratch file {path}: {source}")]
    ScratchFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn cracker process: {0}")]
    SpawnFailed(std::io::Error),

    #[error("failed to open output file for tailing: {0}")]
    TailFailed(std::io::Error),

    #[error("session was not started")]
    NotStarted,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
