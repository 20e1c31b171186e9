// [libs/domain/models/src/config.rs]
//! Agent-wide configuration: paths, thresholds, credentials, and the
//! server-advertised knobs refreshed on every `reload`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_gpu_temp_threshold() -> u32 {
    80
}
fn default_status_timer() -> u64 {
    3
}
fn default_outfile_check_timer() -> u64 {
    5
}
fn default_sleep_on_failure_secs() -> u64 {
    60
}
fn default_benchmark_update_frequency_secs() -> u64 {
    168 * 3600
}
fn default_heartbeat_interval_secs() -> u64 {
    60
}

/// Configuration loaded from `cipherswarmagent.{yaml}`, CLI flags, and
/// environment variables, layered in that order of increasing priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub api_url: String,
    pub api_token: String,
    pub data_path: PathBuf,

    #[serde(default)]
    pub always_trust_files: bool,
    #[serde(default)]
    pub retain_zaps_on_completion: bool,
    #[serde(default = "default_gpu_temp_threshold")]
    pub gpu_temp_threshold: u32,
    #[serde(default = "default_status_timer")]
    pub status_timer: u64,
    #[serde(default = "default_outfile_check_timer")]
    pub outfile_check_timer: u64,
    #[serde(default = "default_sleep_on_failure_secs")]
    pub sleep_on_failure_secs: u64,
    #[serde(default = "default_benchmark_update_frequency_secs")]
    pub benchmark_update_frequency_secs: u64,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Fields refreshed from `get_agent_configuration()` at startup and
    /// on every `reload`.
    #[serde(default)]
    pub agent_update_interval_secs: u64,
    #[serde(default)]
    pub use_native_cracker: bool,
}

impl AgentConfig {
    pub fn files_path(&self) -> PathBuf {
        self.data_path.join("files")
    }
    pub fn hashlists_path(&self) -> PathBuf {
        self.data_path.join("hashlists")
    }
    pub fn zaps_path(&self) -> PathBuf {
        self.data_path.join("zaps")
    }
    pub fn output_path(&self) -> PathBuf {
        self.data_path.join("output")
    }
    pub fn restore_path(&self) -> PathBuf {
        self.data_path.join("restore")
    }
    pub fn agent_lock_path(&self) -> PathBuf {
        self.data_path.join("lock.pid")
    }
    pub fn cracker_lock_path(&self) -> PathBuf {
        self.data_path.join("hashcat.pid")
    }

    pub fn sleep_on_failure(&self) -> Duration {
        Duration::from_secs(self.sleep_on_failure_secs)
    }
    pub fn agent_update_interval(&self) -> Duration {
        Duration::from_secs(self.agent_update_interval_secs.max(1))
    }
    pub fn benchmark_update_frequency(&self) -> Duration {
        Duration::from_secs(self.benchmark_update_frequency_secs)
    }
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
