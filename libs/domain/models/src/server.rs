// [libs/domain/models/src/server.rs]
//! Heartbeat state the coordinator returns every minute.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    Active,
    Pending,
    Stopped,
    Error,
}
