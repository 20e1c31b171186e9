// [libs/domain/models/src/status.rs]
//! The cracker's machine-readable status JSON, one object per stdout
//! line while an attack is running.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessInfo {
    pub guess_base: String,
    pub guess_base_offset: u64,
    pub guess_base_count: u64,
    pub guess_base_percent: f64,
    pub guess_mod: String,
    pub guess_mod_offset: u64,
    pub guess_mod_count: u64,
    pub guess_mod_percent: f64,
    pub guess_mode: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_id: u32,
    pub device_name: String,
    pub device_type: String,
    pub speed: u64,
    pub util: u32,
    pub temp: i32,
}

/// One status object as emitted by `--status-json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrackerStatus {
    pub session: String,
    pub status: u32,
    pub target: String,
    pub progress: [u64; 2],
    pub restore_point: u64,
    pub recovered_hashes: [u64; 2],
    pub recovered_salts: [u64; 2],
    pub rejected: u64,
    pub time_start: u64,
    pub estimated_stop: u64,
    pub guess: GuessInfo,
    pub devices: Vec<DeviceStatus>,
}

impl CrackerStatus {
    pub fn progress_percent(&self) -> f64 {
        let [current, total] = self.progress;
        if total == 0 {
            0.0
        } else {
            (current as f64 / total as f64) * 100.0
        }
    }
}
