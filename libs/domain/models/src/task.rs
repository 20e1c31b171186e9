// [libs/domain/models/src/task.rs]
//! Task records: one agent's instance of a server-described attack.

use serde::{Deserialize, Serialize};

/// Current activity of the agent, surfaced in heartbeats and display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Starting,
    Benchmarking,
    Updating,
    Waiting,
    Cracking,
    Stopping,
}

/// A resumption cursor: how far into the keyspace the last observed
/// status reported progress, used to seed `skip`/`limit` on restart.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressCursor {
    pub skip: u64,
    pub limit: u64,
}

/// Accumulated statistics folded into the next status upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStats {
    pub cracked_count: u64,
    pub rejected_count: u64,
}

/// One agent's slice of a server-described attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub attack_id: String,
    #[serde(default)]
    pub cursor: ProgressCursor,
    #[serde(default)]
    pub stats: TaskStats,
}

impl Task {
    pub fn new(id: impl Into<String>, attack_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attack_id: attack_id.into(),
            cursor: ProgressCursor::default(),
            stats: TaskStats::default(),
        }
    }

    /// Derives the `--session` identifier used by the arg builder.
    pub fn session_name(&self) -> String {
        format!("attack-{}", self.id)
    }
}
